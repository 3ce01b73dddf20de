use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default label table: the Sri Aman landmark classes the bundled model was
/// trained on, in model output order.
pub const LANDMARK_CLASSES: [&str; 10] = [
    "Bujang_Senang_Statue",
    "Fort_Alice",
    "JKR_Pigeon",
    "Jalan_Bayu_Pigeon",
    "Old_Bomba_Roundabout_Pigeon",
    "Old_Bus_Station_Swallows",
    "Rumah_Sri_Aman",
    "Simanggang_Town_Roundabout_Pigeon",
    "Three_Fish_Statue",
    "Tze_Yin_Khor_Guan_Yin",
];

/// Ordered class names, indexed by the decoder's class index.
#[derive(Debug, Clone)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Load labels from a plain-text file, one label per line. Blank lines
    /// are ignored.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut names = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                names.push(trimmed.to_string());
            }
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for a class index. An index outside the table indicates a
    /// decoder/layout mismatch upstream.
    pub fn name(&self, class_index: usize) -> &str {
        debug_assert!(
            class_index < self.names.len(),
            "class index {class_index} outside label table of {} entries",
            self.names.len()
        );
        self.names
            .get(class_index)
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        Self::new(LANDMARK_CLASSES.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_ten_landmarks() {
        let labels = ClassLabels::default();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels.name(0), "Bujang_Senang_Statue");
        assert_eq!(labels.name(9), "Tze_Yin_Khor_Guan_Yin");
    }

    #[test]
    fn test_custom_table_lookup() {
        let labels = ClassLabels::new(vec!["cat".to_string(), "dog".to_string()]);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.name(1), "dog");
    }
}
