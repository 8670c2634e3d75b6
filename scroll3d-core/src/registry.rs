/// Static section list and the model shown for each section
use crate::error::{ConfigError, Result};
use crate::orbit::CameraOrbit;

/// A content region on the page
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub index: usize,
    /// Host reference to the region (element id, label, ...)
    pub region: String,
}

/// Model resource and camera orientation for one section
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBinding {
    pub source: String,
    pub camera_orbit: CameraOrbit,
}

impl ModelBinding {
    pub fn new(source: impl Into<String>, camera_orbit: CameraOrbit) -> Self {
        Self {
            source: source.into(),
            camera_orbit,
        }
    }

    /// Build a binding from a raw orbit descriptor
    pub fn parse(index: usize, source: impl Into<String>, orbit: &str) -> Result<Self> {
        let camera_orbit = CameraOrbit::parse(orbit)
            .map_err(|message| ConfigError::InvalidOrbit { index, message })?;
        Ok(Self::new(source, camera_orbit))
    }
}

/// Ordered sections with a parallel list of bindings; never mutated after construction
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<Section>,
    bindings: Vec<ModelBinding>,
}

impl SectionRegistry {
    pub fn new<S: Into<String>>(regions: Vec<S>, bindings: Vec<ModelBinding>) -> Result<Self> {
        if regions.is_empty() {
            return Err(ConfigError::NoSections);
        }
        if bindings.is_empty() {
            return Err(ConfigError::NoBindings);
        }
        if regions.len() != bindings.len() {
            return Err(ConfigError::LengthMismatch {
                sections: regions.len(),
                bindings: bindings.len(),
            });
        }

        let sections = regions
            .into_iter()
            .enumerate()
            .map(|(index, region)| Section {
                index,
                region: region.into(),
            })
            .collect();

        Ok(Self { sections, bindings })
    }

    pub fn count(&self) -> usize {
        self.sections.len()
    }

    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn binding_at(&self, index: usize) -> Option<&ModelBinding> {
        self.bindings.get(index)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(src: &str) -> ModelBinding {
        ModelBinding::parse(0, src, "0deg 90deg 100%").unwrap()
    }

    #[test]
    fn test_registry_lookup() {
        let bindings = vec![binding("/a.glb"), binding("/b.glb")];
        let registry = SectionRegistry::new(vec!["a", "b"], bindings).unwrap();
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.section_at(1).unwrap().region, "b");
        assert_eq!(registry.binding_at(1).unwrap().source, "/b.glb");
        assert!(registry.binding_at(2).is_none());
    }

    #[test]
    fn test_registry_rejects_bad_input() {
        let empty: Vec<&str> = Vec::new();
        assert!(matches!(
            SectionRegistry::new(empty, vec![binding("/a.glb")]),
            Err(ConfigError::NoSections)
        ));
        assert!(matches!(
            SectionRegistry::new(vec!["a"], Vec::new()),
            Err(ConfigError::NoBindings)
        ));
        assert!(matches!(
            SectionRegistry::new(vec!["a", "b"], vec![binding("/a.glb")]),
            Err(ConfigError::LengthMismatch { sections: 2, bindings: 1 })
        ));
    }

    #[test]
    fn test_binding_rejects_bad_orbit() {
        let err = ModelBinding::parse(3, "/a.glb", "sideways").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrbit { index: 3, .. }));
    }
}
