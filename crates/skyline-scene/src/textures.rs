//! Texture file table.

use skyline_geom::{GROUND_TEXTURE, SKY_TEXTURE};

use crate::{Result, SceneError};

/// Texture file names, indexed by the slot materials refer to.
///
/// The sky texture always occupies [`SKY_TEXTURE`] and the ground texture
/// [`GROUND_TEXTURE`], even when both name the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRegistry {
    names: Vec<String>,
}

impl TextureRegistry {
    /// Slots are bytes on the device.
    pub const MAX_TEXTURES: usize = u8::MAX as usize + 1;

    /// Create a table holding the sky and ground textures.
    pub fn new(sky: impl Into<String>, ground: impl Into<String>) -> Self {
        let mut names = vec![String::new(); 2];
        names[SKY_TEXTURE as usize] = sky.into();
        names[GROUND_TEXTURE as usize] = ground.into();
        Self { names }
    }

    /// Slot of `name`, adding it to the end of the table if it is new.
    pub fn find_or_create(&mut self, name: &str) -> Result<u8> {
        if let Some(slot) = self.find(name) {
            return Ok(slot);
        }
        if self.names.len() >= Self::MAX_TEXTURES {
            return Err(SceneError::TooManyTextures);
        }
        self.names.push(name.to_owned());
        Ok((self.names.len() - 1) as u8)
    }

    /// Slot of `name`, if it is in the table.
    ///
    /// When the sky and ground share a file, materials get the ground slot.
    pub fn find(&self, name: &str) -> Option<u8> {
        if self.ground() == name {
            return Some(GROUND_TEXTURE);
        }
        self.names.iter().position(|n| n == name).map(|i| i as u8)
    }

    /// File name in `slot`.
    pub fn name(&self, slot: u8) -> Option<&str> {
        self.names.get(slot as usize).map(String::as_str)
    }

    /// All file names in slot order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sky texture file.
    pub fn sky(&self) -> &str {
        &self.names[SKY_TEXTURE as usize]
    }

    /// Ground texture file.
    pub fn ground(&self) -> &str {
        &self.names[GROUND_TEXTURE as usize]
    }

    /// Number of slots in use.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; the sky and ground slots are reserved.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_slots() {
        let t = TextureRegistry::new("sky.png", "grass.png");
        assert_eq!(t.find("sky.png"), Some(SKY_TEXTURE));
        assert_eq!(t.find("grass.png"), Some(GROUND_TEXTURE));
        assert_eq!(t.sky(), "sky.png");
        assert_eq!(t.ground(), "grass.png");
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_find_or_create_interns() {
        let mut t = TextureRegistry::new("sky.png", "grass.png");
        assert_eq!(t.find_or_create("brick.png").unwrap(), 2);
        assert_eq!(t.find_or_create("glass.png").unwrap(), 3);
        assert_eq!(t.find_or_create("brick.png").unwrap(), 2);
        assert_eq!(t.find_or_create("grass.png").unwrap(), GROUND_TEXTURE);
        assert_eq!(t.name(3), Some("glass.png"));
        assert_eq!(t.name(9), None);
    }

    #[test]
    fn test_same_file_for_sky_and_ground() {
        let mut t = TextureRegistry::new("plain.png", "plain.png");
        assert_eq!(t.len(), 2);
        assert_eq!(t.ground(), "plain.png");
        assert_eq!(t.find("plain.png"), Some(GROUND_TEXTURE));
        assert_eq!(t.find_or_create("plain.png").unwrap(), GROUND_TEXTURE);
        assert_eq!(t.len(), 2);
        assert_eq!(t.sky(), "plain.png");
    }

    #[test]
    fn test_table_full() {
        let mut t = TextureRegistry::new("sky.png", "grass.png");
        for i in 2..TextureRegistry::MAX_TEXTURES {
            assert_eq!(t.find_or_create(&format!("t{i}.png")).unwrap() as usize, i);
        }
        assert!(matches!(t.find_or_create("one-more.png"), Err(SceneError::TooManyTextures)));
        // Existing names still resolve
        assert_eq!(t.find_or_create("t7.png").unwrap(), 7);
    }
}
