use crate::error::Result;
use crate::models::{Location, WeatherDataset};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonWriter {
    indent: Vec<u8>,
}

impl JsonWriter {
    /// Pretty printer with four-space indentation.
    pub fn new() -> Self {
        Self {
            indent: b"    ".to_vec(),
        }
    }

    pub fn write_dataset(&self, dataset: &WeatherDataset, path: &Path) -> Result<()> {
        self.write_value(dataset, path)
    }

    pub fn write_locations(&self, locations: &[Location], path: &Path) -> Result<()> {
        self.write_value(locations, path)
    }

    pub fn to_json_string<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let mut buffer = Vec::new();
        self.serialize_into(value, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_value<T: Serialize + ?Sized>(&self, value: &T, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.serialize_into(value, &mut writer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }

    fn serialize_into<T, W>(&self, value: &T, writer: W) -> Result<()>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        let formatter = PrettyFormatter::with_indent(&self.indent);
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        value.serialize(&mut serializer)?;
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
