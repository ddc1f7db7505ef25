//! Sensor Identifiers and Feed Routing
//!
//! Every monitored quantity has a fixed `SensorIndex`. The index is the key
//! for gauge tables, staleness state and exclusion sets, so lookups are array
//! indexing and set membership is a bit test.
//!
//! Samples arrive over MQTT, one topic per device. `Source` records which
//! topic carries which sensors; decoding the payload itself happens outside
//! this crate.

use core::fmt;

/// Whether a sensor reports a measurement or an on/off state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    /// Continuous reading compared with a tolerance
    Continuous,
    /// Boolean state compared exactly
    Binary,
}

/// Monitored quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorIndex {
    /// Rain sensor raw ADC reading
    RainCurrent = 0,
    /// Rain sensor dry baseline
    RainBaseline = 1,
    /// Rain sensor board uptime
    RainUptime = 2,
    /// Rain detected
    RainState = 3,
    /// Rain sensor cable connected
    RainCableConnected = 4,
    /// Pico W room temperature
    PicoTemp = 5,
    /// Pico W room humidity
    PicoHumidity = 6,
    /// Pico W room CO2
    PicoCo2 = 7,
    /// Pico W thermal-humidity index
    PicoThi = 8,
    /// Outdoor temperature
    OutdoorTemp = 9,
    /// Outdoor humidity
    OutdoorHumidity = 10,
    /// Outdoor barometric pressure
    OutdoorPressure = 11,
    /// Raspberry Pi CPU temperature
    RpiTemp = 12,
    /// QZSS receiver Pi CPU temperature
    QzssTemp = 13,
    /// Study room CO2
    StudyCo2 = 14,
    /// Study room temperature
    StudyTemp = 15,
    /// Study room humidity
    StudyHumidity = 16,
}

impl SensorIndex {
    /// Number of sensors
    pub const COUNT: usize = 17;

    /// All sensors in index order
    pub const ALL: [SensorIndex; Self::COUNT] = [
        Self::RainCurrent,
        Self::RainBaseline,
        Self::RainUptime,
        Self::RainState,
        Self::RainCableConnected,
        Self::PicoTemp,
        Self::PicoHumidity,
        Self::PicoCo2,
        Self::PicoThi,
        Self::OutdoorTemp,
        Self::OutdoorHumidity,
        Self::OutdoorPressure,
        Self::RpiTemp,
        Self::QzssTemp,
        Self::StudyCo2,
        Self::StudyTemp,
        Self::StudyHumidity,
    ];

    /// Position in tables keyed by sensor
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case name, as used in configuration documents
    pub const fn name(self) -> &'static str {
        match self {
            Self::RainCurrent => "rain_current",
            Self::RainBaseline => "rain_baseline",
            Self::RainUptime => "rain_uptime",
            Self::RainState => "rain_state",
            Self::RainCableConnected => "rain_cable_connected",
            Self::PicoTemp => "pico_temp",
            Self::PicoHumidity => "pico_humidity",
            Self::PicoCo2 => "pico_co2",
            Self::PicoThi => "pico_thi",
            Self::OutdoorTemp => "outdoor_temp",
            Self::OutdoorHumidity => "outdoor_humidity",
            Self::OutdoorPressure => "outdoor_pressure",
            Self::RpiTemp => "rpi_temp",
            Self::QzssTemp => "qzss_temp",
            Self::StudyCo2 => "study_co2",
            Self::StudyTemp => "study_temp",
            Self::StudyHumidity => "study_humidity",
        }
    }

    /// Look a sensor up by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|sensor| sensor.name() == name)
    }

    /// Unit of measurement (empty for raw counts, indices and flags)
    pub const fn unit(self) -> &'static str {
        match self {
            Self::RainUptime => "h",
            Self::PicoTemp
            | Self::OutdoorTemp
            | Self::RpiTemp
            | Self::QzssTemp
            | Self::StudyTemp => "°C",
            Self::PicoHumidity | Self::OutdoorHumidity | Self::StudyHumidity => "%",
            Self::PicoCo2 | Self::StudyCo2 => "ppm",
            Self::OutdoorPressure => "hPa",
            Self::RainCurrent
            | Self::RainBaseline
            | Self::RainState
            | Self::RainCableConnected
            | Self::PicoThi => "",
        }
    }

    /// How samples of this sensor are compared
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::RainState | Self::RainCableConnected => ValueKind::Binary,
            _ => ValueKind::Continuous,
        }
    }

    /// Device feed that reports this sensor
    pub const fn source(self) -> Source {
        match self {
            Self::RainCurrent
            | Self::RainBaseline
            | Self::RainUptime
            | Self::RainState
            | Self::RainCableConnected => Source::Rain,
            Self::PicoTemp | Self::PicoHumidity | Self::PicoCo2 | Self::PicoThi => Source::Pico,
            Self::OutdoorTemp | Self::OutdoorHumidity | Self::OutdoorPressure => Source::Env4,
            Self::RpiTemp => Source::RpiTemp,
            Self::QzssTemp => Source::QzssTemp,
            Self::StudyCo2 | Self::StudyTemp | Self::StudyHumidity => Source::M5StickC,
        }
    }
}

impl fmt::Display for SensorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// MQTT feed publishing a group of sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Rain sensor board
    Rain,
    /// Pico W room node
    Pico,
    /// ENV IV outdoor unit
    Env4,
    /// Raspberry Pi CPU temperature
    RpiTemp,
    /// QZSS receiver Pi CPU temperature
    QzssTemp,
    /// M5StickC CO2 monitor in the study
    M5StickC,
}

impl Source {
    /// All feeds
    pub const ALL: [Source; 6] = [
        Self::Rain,
        Self::Pico,
        Self::Env4,
        Self::RpiTemp,
        Self::QzssTemp,
        Self::M5StickC,
    ];

    /// Default MQTT topic
    pub const fn topic(self) -> &'static str {
        match self {
            Self::Rain => "home/weather/rain_sensor",
            Self::Pico => "sensor_data",
            Self::Env4 => "env4",
            Self::RpiTemp => "raspberry/temperature",
            Self::QzssTemp => "raspberry/qzss/temperature",
            Self::M5StickC => "m5stickc_co2/co2_data",
        }
    }

    /// Route an incoming topic to its feed
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|source| source.topic() == topic)
    }

    /// Sensors carried by this feed
    pub fn sensors(self) -> impl Iterator<Item = SensorIndex> {
        SensorIndex::ALL
            .into_iter()
            .filter(move |sensor| sensor.source() == self)
    }
}

/// Set of sensors, stored as a bitmask over `SensorIndex`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SensorSet {
    bits: u32,
}

const _: () = assert!(SensorIndex::COUNT <= u32::BITS as usize);

impl SensorSet {
    /// Set with no members
    pub const EMPTY: SensorSet = SensorSet { bits: 0 };

    /// Build a set at compile time
    pub const fn from_slice(sensors: &[SensorIndex]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < sensors.len() {
            bits |= 1u32 << (sensors[i] as u32);
            i += 1;
        }
        Self { bits }
    }

    /// Membership test
    pub const fn contains(&self, sensor: SensorIndex) -> bool {
        self.bits & (1u32 << (sensor as u32)) != 0
    }

    /// Add a sensor; returns `true` if it was not already present
    pub fn insert(&mut self, sensor: SensorIndex) -> bool {
        let was_present = self.contains(sensor);
        self.bits |= 1u32 << (sensor as u32);
        !was_present
    }

    /// Remove a sensor; returns `true` if it was present
    pub fn remove(&mut self, sensor: SensorIndex) -> bool {
        let was_present = self.contains(sensor);
        self.bits &= !(1u32 << (sensor as u32));
        was_present
    }

    /// Number of members
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// True if the set has no members
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Members in index order
    pub fn iter(&self) -> impl Iterator<Item = SensorIndex> + '_ {
        SensorIndex::ALL
            .into_iter()
            .filter(move |sensor| self.contains(*sensor))
    }
}

impl fmt::Debug for SensorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<SensorIndex> for SensorSet {
    fn from_iter<I: IntoIterator<Item = SensorIndex>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl Extend<SensorIndex> for SensorSet {
    fn extend<I: IntoIterator<Item = SensorIndex>>(&mut self, iter: I) {
        for sensor in iter {
            self.insert(sensor);
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SensorSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SensorSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> serde::de::Visitor<'de> for SetVisitor {
            type Value = SensorSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of sensor names")
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<SensorSet, A::Error> {
                let mut set = SensorSet::EMPTY;
                while let Some(sensor) = seq.next_element::<SensorIndex>()? {
                    set.insert(sensor);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor)
    }
}
