use std::{fmt, sync::Arc};

use graphbinary_error::{GraphBinaryError, GraphBinaryResult};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{serializers, Cursor, DataType, OutputBuffer, Reader, Writer};
use crate::types::Value;

/// Writes the value-only payload of `value`.
pub type WriteValueFn = fn(&Value, &mut Writer<'_>) -> GraphBinaryResult<OutputBuffer>;

/// Reads the value-only payload of a value of the given type.
pub type ReadValueFn = fn(DataType, &mut Cursor<'_>, &mut Reader<'_>) -> GraphBinaryResult<Value>;

/// Serializer of one wire type: a pair of value-only codec functions.
///
/// The tag and null flag around the payload are handled by the
/// [`Writer`]/[`Reader`] engine.
#[derive(Clone, Copy)]
pub struct SerializerEntry {
    pub data_type: DataType,
    pub write_value: WriteValueFn,
    pub read_value: ReadValueFn,
}

impl SerializerEntry {
    pub const fn new(
        data_type: DataType,
        write_value: WriteValueFn,
        read_value: ReadValueFn,
    ) -> Self {
        Self {
            data_type,
            write_value,
            read_value,
        }
    }
}

impl fmt::Debug for SerializerEntry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SerializerEntry")
            .field("data_type", &self.data_type)
            .finish_non_exhaustive()
    }
}

/// Serializer for an application-defined type travelling under the
/// [`DataType::Custom`] tag.
///
/// Implementations only see the inner value of a
/// [`CustomValue`](crate::types::CustomValue); the type name is written and
/// read by the codec.
pub trait CustomTypeSerializer: Send + Sync + 'static {
    /// Name the type is registered and transmitted under.
    fn type_name(&self) -> &str;

    fn write_value(
        &self,
        value: &Value,
        writer: &mut Writer<'_>,
    ) -> GraphBinaryResult<OutputBuffer>;

    fn read_value(
        &self,
        cursor: &mut Cursor<'_>,
        reader: &mut Reader<'_>,
    ) -> GraphBinaryResult<Value>;
}

static GLOBAL: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::with_defaults);

/// Immutable map from type tag to serializer.
///
/// Built once through [`TypeRegistryBuilder`]; lookups afterwards are plain
/// array indexing and need no locking.
pub struct TypeRegistry {
    entries: [Option<SerializerEntry>; 256],
    custom: FxHashMap<String, Arc<dyn CustomTypeSerializer>>,
}

impl TypeRegistry {
    /// Process-wide registry holding the built-in serializers.
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Registry of the built-in serializers. Their tags are unique, so this
    /// does not go through the duplicate checks of [`TypeRegistryBuilder`].
    pub fn with_defaults() -> Self {
        let mut entries = [None; 256];
        for entry in serializers::default_entries() {
            entries[entry.data_type.tag() as usize] = Some(entry);
        }
        Self {
            entries,
            custom: FxHashMap::default(),
        }
    }

    /// Decode-side lookup; `offset` is where the tag was read.
    pub fn serializer_for_tag(
        &self,
        tag: u8,
        offset: usize,
    ) -> GraphBinaryResult<&SerializerEntry> {
        self.entries[tag as usize]
            .as_ref()
            .ok_or(GraphBinaryError::UnknownType { tag, offset })
    }

    /// Encode-side lookup by runtime type.
    pub fn serializer_for(
        &self,
        data_type: DataType,
    ) -> GraphBinaryResult<&SerializerEntry> {
        self.entries[data_type.tag() as usize]
            .as_ref()
            .ok_or_else(|| GraphBinaryError::unsupported(data_type.name()))
    }

    /// Encode-side lookup for a concrete value. Custom values also need
    /// their named serializer to be registered.
    pub fn serializer_for_value(
        &self,
        value: &Value,
    ) -> GraphBinaryResult<&SerializerEntry> {
        let entry = self
            .serializer_for(value.data_type())
            .map_err(|_| GraphBinaryError::unsupported(value.type_name()))?;
        if let Value::Custom(custom) = value {
            self.custom_serializer(&custom.type_name)?;
        }
        Ok(entry)
    }

    pub fn custom_serializer(
        &self,
        type_name: &str,
    ) -> GraphBinaryResult<&Arc<dyn CustomTypeSerializer>> {
        self.custom
            .get(type_name)
            .ok_or_else(|| GraphBinaryError::unsupported(format!("Custom({type_name})")))
    }

    pub fn supports(
        &self,
        data_type: DataType,
    ) -> bool {
        self.entries[data_type.tag() as usize].is_some()
    }

    /// Registered types in tag order.
    pub fn data_types(&self) -> impl Iterator<Item = DataType> + '_ {
        self.entries.iter().flatten().map(|e| e.data_type)
    }

    /// Names of the registered custom types, sorted.
    pub fn custom_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.data_types().count())
            .field("custom", &self.custom_type_names())
            .finish()
    }
}

/// Collects serializers and produces a [`TypeRegistry`].
#[derive(Default)]
pub struct TypeRegistryBuilder {
    entries: Vec<SerializerEntry>,
    custom: Vec<Arc<dyn CustomTypeSerializer>>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every built-in serializer.
    pub fn with_defaults(mut self) -> Self {
        self.entries.extend(serializers::default_entries());
        self
    }

    pub fn register(
        mut self,
        entry: SerializerEntry,
    ) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn register_custom<S: CustomTypeSerializer>(
        mut self,
        serializer: S,
    ) -> Self {
        self.custom.push(Arc::new(serializer));
        self
    }

    /// Drops every entry for `data_type` collected so far.
    pub fn without(
        mut self,
        data_type: DataType,
    ) -> Self {
        self.entries.retain(|e| e.data_type != data_type);
        self
    }

    /// Fails on a tag or custom type name registered twice.
    pub fn build(self) -> GraphBinaryResult<TypeRegistry> {
        let mut entries = [None; 256];
        for entry in self.entries {
            let slot = &mut entries[entry.data_type.tag() as usize];
            if slot.is_some() {
                return Err(GraphBinaryError::Registration {
                    reason: format!("duplicate serializer for {}", entry.data_type),
                });
            }
            *slot = Some(entry);
        }

        let mut seen = FxHashSet::default();
        let mut custom = FxHashMap::default();
        for serializer in self.custom {
            let name = serializer.type_name().to_string();
            if !seen.insert(name.clone()) {
                return Err(GraphBinaryError::Registration {
                    reason: format!("duplicate custom type {name}"),
                });
            }
            custom.insert(name, serializer);
        }

        Ok(TypeRegistry { entries, custom })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
