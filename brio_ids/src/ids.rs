//! Type-safe generational identifiers for arena-stored objects.
//! All IDs use u64 = index (low 32 bits) | generation (high 32 bits). Index 0 = nil.
//! IDs are created by their owning arena; slot reuse bumps the generation so stale IDs are invalid.

use std::fmt;

pub const fn string_to_u64(s: &str) -> u64 {
    let mut hash: u64 = 0xA0761D6478BD642F;
    let bytes = s.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0xE7037ED1A0B428DB);
        hash = mix64(hash);
        i += 1;
    }

    mix64(hash ^ (bytes.len() as u64))
}

pub const fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^= x >> 31;
    x
}

// ---- Generational ID: base encoding ----
// u64 layout: low 32 = index (0 = nil, 1.. = slot), high 32 = generation.
// When a slot is reused, generation is bumped so old IDs no longer match.

/// Defines a generational ID type (NodeId, SceneId, TextureId, ...).
/// All such IDs use index + generation for safe arena slot reuse.
macro_rules! define_generational_id {
    ($type_name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type_name(pub u64);

        impl $type_name {
            #[inline]
            pub const fn nil() -> Self {
                Self(0)
            }

            #[inline]
            pub const fn index(self) -> u32 {
                (self.0 & 0xFFFF_FFFF) as u32
            }

            #[inline]
            pub const fn generation(self) -> u32 {
                (self.0 >> 32) as u32
            }

            #[inline]
            pub const fn from_parts(index: u32, generation: u32) -> Self {
                Self((index as u64) | ((generation as u64) << 32))
            }

            #[inline]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            #[inline]
            pub const fn is_nil(self) -> bool {
                self.0 == 0
            }
        }

        impl Default for $type_name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl fmt::Debug for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($type_name), "({}:{})"),
                    self.index(),
                    self.generation()
                )
            }
        }

        impl fmt::Display for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.index(), self.generation())
            }
        }
    };
}

define_generational_id!(
    NodeId,
    "Node ID — allocated by NodeArena. Index + generation."
);
define_generational_id!(
    SceneId,
    "Scene ID — allocated by SceneRegistry. Index + generation."
);
define_generational_id!(
    TextureId,
    "Texture ID — allocated by an external texture store. Index + generation."
);

/// Stable identity for a script type, derived from a name the type declares.
/// Const-hashed so the key survives recompilation and dynamic loading.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScriptKey(pub u64);

impl ScriptKey {
    pub const fn from_name(name: &str) -> Self {
        Self(string_to_u64(name))
    }
}
