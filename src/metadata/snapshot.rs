// src/metadata/snapshot.rs
use crate::types::{ByteOrder, Geometry, Revision, SampleFormat};
use std::fmt;

/// A single value in the metadata mapping
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Int(v) => write!(f, "{}", v),
            MetadataValue::Float(v) => write!(f, "{}", v),
            MetadataValue::Text(v) => f.write_str(v),
        }
    }
}

/// Read-only view of a file's geometry, as returned by `get_metadata`
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSnapshot {
    pub samples_per_trace: usize,
    pub bytes_per_sample: usize,
    pub data_format: SampleFormat,
    pub byte_order: ByteOrder,
    pub trace_count: u64,
    /// Microseconds
    pub sample_interval: f64,
    pub geometry: Geometry,
    pub revision: Revision,
    pub extended_header_count: u32,
    pub size_consistent: bool,
}

impl MetadataSnapshot {
    pub const SAMPLES_PER_TRACE: &'static str = "Samples Per Trace";
    pub const BYTES_PER_SAMPLE: &'static str = "Bytes Per Sample";
    pub const DATA_FORMAT: &'static str = "Data Format";
    pub const BYTE_ORDER: &'static str = "Byte Order";
    pub const TRACE_COUNT: &'static str = "Trace Count";
    pub const SAMPLE_INTERVAL: &'static str = "Sample Interval";
    pub const INDEX: &'static str = "index";

    /// The fixed key/value mapping exposed to bindings, in display order
    pub fn entries(&self) -> Vec<(&'static str, MetadataValue)> {
        vec![
            (Self::SAMPLES_PER_TRACE, MetadataValue::Int(self.samples_per_trace as i64)),
            (Self::BYTES_PER_SAMPLE, MetadataValue::Int(self.bytes_per_sample as i64)),
            (Self::DATA_FORMAT, MetadataValue::Text(self.data_format.name().to_string())),
            (Self::BYTE_ORDER, MetadataValue::Text(self.byte_order.name().to_string())),
            (Self::TRACE_COUNT, MetadataValue::Int(self.trace_count as i64)),
            (Self::SAMPLE_INTERVAL, MetadataValue::Float(self.sample_interval)),
            (Self::INDEX, MetadataValue::Int(self.geometry.id())),
        ]
    }

    pub fn get(&self, key: &str) -> Option<MetadataValue> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Sample times in milliseconds, starting at zero
    pub fn sample_times_ms(&self) -> Vec<f64> {
        (0..self.samples_per_trace)
            .map(|i| i as f64 * self.sample_interval / 1000.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MetadataSnapshot {
        MetadataSnapshot {
            samples_per_trace: 4,
            bytes_per_sample: 4,
            data_format: SampleFormat::IeeeFloat32,
            byte_order: ByteOrder::Big,
            trace_count: 10,
            sample_interval: 2000.0,
            geometry: Geometry::Fixed,
            revision: Revision::default(),
            extended_header_count: 0,
            size_consistent: true,
        }
    }

    #[test]
    fn test_fixed_keys() {
        let keys: Vec<&str> = snapshot().entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "Samples Per Trace",
                "Bytes Per Sample",
                "Data Format",
                "Byte Order",
                "Trace Count",
                "Sample Interval",
                "index",
            ]
        );
    }

    #[test]
    fn test_lookup() {
        let s = snapshot();
        assert_eq!(s.get("Trace Count").and_then(|v| v.as_int()), Some(10));
        assert_eq!(s.get("Byte Order").unwrap().as_str(), Some("big"));
        assert_eq!(s.get("Data Format").unwrap().to_string(), "IEEEf32");
        assert_eq!(s.get("Sample Interval").and_then(|v| v.as_float()), Some(2000.0));
        assert_eq!(s.get("index").and_then(|v| v.as_int()), Some(0));
        assert!(s.get("nope").is_none());
    }

    #[test]
    fn test_sample_times() {
        assert_eq!(snapshot().sample_times_ms(), vec![0.0, 2.0, 4.0, 6.0]);
    }
}
