//! `serde` support.
//!
//! Cells serialize as their current value and arrays as their
//! [`snapshot`](AtomicArray::snapshot), so a serialized array carries the
//! same per-element (not point-in-time) guarantee. Deserialization builds
//! fresh cells; the primitive deserializer rejects out-of-range input.
//! `WidthKind` uses its C type name.

use core::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::array::AtomicArray;
use crate::cell::AtomicCell;
use crate::width::{Width, WidthKind};

impl<W: Width> Serialize for AtomicCell<W> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

impl<'de, W: Width> Deserialize<'de> for AtomicCell<W> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <W::Value as Deserialize<'de>>::deserialize(deserializer).map(AtomicCell::new)
    }
}

impl<W: Width> Serialize for AtomicArray<W> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self.iter() {
            seq.serialize_element(&value)?;
        }
        seq.end()
    }
}

impl<'de, W: Width> Deserialize<'de> for AtomicArray<W> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<W::Value>::deserialize(deserializer).map(AtomicArray::from_values)
    }
}

impl Serialize for WidthKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

struct WidthKindVisitor;

impl<'de> Visitor<'de> for WidthKindVisitor {
    type Value = WidthKind;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a C integer type name such as \"unsigned int\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<WidthKind, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for WidthKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(WidthKindVisitor)
    }
}
