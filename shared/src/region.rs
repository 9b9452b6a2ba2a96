/// FIPS prefix of Nevada county ids.
pub const NEVADA_PREFIX: &str = "32";

/// Decides whether a feature belongs to the highlighted state by the first
/// two characters of its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionClassifier {
    prefix: String,
}

impl RegionClassifier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn classify(&self, id: Option<&str>) -> bool {
        match id {
            Some(id) => id.get(..2).is_some_and(|head| head == self.prefix),
            None => false,
        }
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(NEVADA_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::RegionClassifier;

    #[test]
    fn truth_table() {
        let nv = RegionClassifier::default();
        assert!(nv.classify(Some("32003")));
        assert!(nv.classify(Some("32")));
        assert!(!nv.classify(Some("06037")));
        assert!(!nv.classify(Some("03200")));
        assert!(!nv.classify(Some("3")));
        assert!(!nv.classify(Some("")));
        assert!(!nv.classify(None));
    }

    #[test]
    fn multibyte_ids_do_not_panic() {
        let nv = RegionClassifier::default();
        assert!(!nv.classify(Some("é2003")));
        assert!(!nv.classify(Some("3é")));
    }

    #[test]
    fn prefix_is_configurable() {
        let ca = RegionClassifier::new("06");
        assert!(ca.classify(Some("06037")));
        assert!(!ca.classify(Some("32003")));
    }
}
