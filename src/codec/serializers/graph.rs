//! Graph structure serializers.
//!
//! Element references carry no parent and no nested properties on the wire;
//! those slots are always an untyped null.

use graphbinary_error::{GraphBinaryError, GraphBinaryResult};

use super::{collection::write_items, mismatch};
use crate::{
    codec::{CompositeBufferBuilder, Cursor, DataType, OutputBuffer, Reader, SerializerEntry, Writer},
    types::{Edge, ElementRef, Path, Property, Value, Vertex, VertexProperty},
};

pub(super) const ENTRIES: &[SerializerEntry] = &[
    SerializerEntry::new(DataType::Vertex, write_vertex, read_vertex),
    SerializerEntry::new(DataType::Edge, write_edge, read_edge),
    SerializerEntry::new(DataType::VertexProperty, write_vertex_property, read_vertex_property),
    SerializerEntry::new(DataType::Property, write_property, read_property),
    SerializerEntry::new(DataType::Path, write_path, read_path),
];

fn append_null(
    w: &mut Writer<'_>,
    b: &mut CompositeBufferBuilder,
) -> GraphBinaryResult<()> {
    b.append_buffer(w.encode(&Value::NULL)?);
    Ok(())
}

fn write_vertex(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Vertex(vertex) = v else {
        return Err(mismatch(DataType::Vertex, v));
    };
    w.composite(3, |w, b| {
        b.append_buffer(w.encode(&vertex.id)?);
        b.append_buffer(w.write_string(&vertex.label)?);
        if vertex.properties.is_empty() {
            return append_null(w, b);
        }
        let properties = w.encode_with(DataType::List, |w| {
            w.composite(1 + vertex.properties.len(), |w, b| {
                b.append_buffer(w.write_count(vertex.properties.len(), "Vertex properties")?);
                for vp in &vertex.properties {
                    b.append_buffer(
                        w.encode_with(DataType::VertexProperty, |w| vertex_property(vp, w))?,
                    );
                }
                Ok(())
            })
        })?;
        b.append_buffer(properties);
        Ok(())
    })
}

fn read_vertex(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let id = r.decode(c)?;
    let label = c.read_string("Vertex label")?;
    let at = c.position();
    let properties = match r.decode(c)? {
        Value::Null(_) => Vec::new(),
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::VertexProperty(vp) => Ok(vp),
                other => Err(GraphBinaryError::malformed(
                    "Vertex properties",
                    format!("expected VertexProperty, found {}", other.type_name()),
                )
                .with_offset(at)),
            })
            .collect::<GraphBinaryResult<_>>()?,
        other => {
            return Err(GraphBinaryError::malformed(
                "Vertex properties",
                format!("expected List or null, found {}", other.type_name()),
            )
            .with_offset(at))
        }
    };
    Ok(Value::Vertex(Vertex {
        id: Box::new(id),
        label,
        properties,
    }))
}

fn write_edge(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Edge(edge) = v else {
        return Err(mismatch(DataType::Edge, v));
    };
    w.composite(8, |w, b| {
        b.append_buffer(w.encode(&edge.id)?);
        b.append_buffer(w.write_string(&edge.label)?);
        for end in [&edge.in_v, &edge.out_v] {
            b.append_buffer(w.encode(&end.id)?);
            b.append_buffer(w.write_string(&end.label)?);
        }
        append_null(w, b)?;
        append_null(w, b)
    })
}

fn read_edge(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let id = r.decode(c)?;
    let label = c.read_string("Edge label")?;
    let in_v = element_ref(c, r, "Edge inV label")?;
    let out_v = element_ref(c, r, "Edge outV label")?;
    r.expect_null(c, "Edge parent")?;
    r.expect_null(c, "Edge properties")?;
    Ok(Value::Edge(Edge {
        id: Box::new(id),
        label,
        in_v,
        out_v,
    }))
}

fn element_ref(
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
    what: &'static str,
) -> GraphBinaryResult<ElementRef> {
    let id = r.decode(c)?;
    let label = c.read_string(what)?;
    Ok(ElementRef {
        id: Box::new(id),
        label,
    })
}

fn write_vertex_property(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::VertexProperty(vp) => vertex_property(vp, w),
        other => Err(mismatch(DataType::VertexProperty, other)),
    }
}

fn vertex_property(
    vp: &VertexProperty,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    w.composite(5, |w, b| {
        b.append_buffer(w.encode(&vp.id)?);
        b.append_buffer(w.write_string(&vp.label)?);
        b.append_buffer(w.encode(&vp.value)?);
        append_null(w, b)?;
        append_null(w, b)
    })
}

fn read_vertex_property(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let id = r.decode(c)?;
    let label = c.read_string("VertexProperty label")?;
    let value = r.decode(c)?;
    r.expect_null(c, "VertexProperty parent")?;
    r.expect_null(c, "VertexProperty properties")?;
    Ok(Value::VertexProperty(VertexProperty {
        id: Box::new(id),
        label,
        value: Box::new(value),
    }))
}

fn write_property(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Property(p) = v else {
        return Err(mismatch(DataType::Property, v));
    };
    w.composite(3, |w, b| {
        b.append_buffer(w.write_string(&p.key)?);
        b.append_buffer(w.encode(&p.value)?);
        append_null(w, b)
    })
}

fn read_property(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let key = c.read_string("Property key")?;
    let value = r.decode(c)?;
    r.expect_null(c, "Property parent")?;
    Ok(Value::Property(Property {
        key,
        value: Box::new(value),
    }))
}

/// `{fq List of Set of String}{fq List}`.
fn write_path(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Path(path) = v else {
        return Err(mismatch(DataType::Path, v));
    };
    if path.labels.len() != path.objects.len() {
        return Err(GraphBinaryError::malformed(
            "Path",
            format!(
                "{} label sets for {} objects",
                path.labels.len(),
                path.objects.len()
            ),
        ));
    }
    w.composite(2, |w, b| {
        let labels = w.encode_with(DataType::List, |w| {
            w.composite(1 + path.labels.len(), |w, b| {
                b.append_buffer(w.write_count(path.labels.len(), "Path labels")?);
                for set in &path.labels {
                    b.append_buffer(w.encode_with(DataType::Set, |w| label_set(set, w))?);
                }
                Ok(())
            })
        })?;
        b.append_buffer(labels);
        b.append_buffer(w.encode_with(DataType::List, |w| write_items(&path.objects, w))?);
        Ok(())
    })
}

fn label_set(
    labels: &[String],
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    w.composite(1 + labels.len(), |w, b| {
        b.append_buffer(w.write_count(labels.len(), "Path label set")?);
        for label in labels {
            b.append_buffer(w.encode_with(DataType::String, |w| w.write_string(label))?);
        }
        Ok(())
    })
}

fn read_path(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let at = c.position();
    let labels = match r.decode(c)? {
        Value::List(sets) => sets
            .into_iter()
            .map(|set| into_label_set(set, at))
            .collect::<GraphBinaryResult<Vec<_>>>()?,
        other => return Err(path_error(format!("labels are {}", other.type_name()), at)),
    };

    let at = c.position();
    let objects = match r.decode(c)? {
        Value::List(objects) => objects,
        other => return Err(path_error(format!("objects are {}", other.type_name()), at)),
    };

    if labels.len() != objects.len() {
        return Err(path_error(
            format!("{} label sets for {} objects", labels.len(), objects.len()),
            at,
        ));
    }
    Ok(Value::Path(Path { labels, objects }))
}

fn into_label_set(
    set: Value,
    at: usize,
) -> GraphBinaryResult<Vec<String>> {
    let members = match set {
        Value::Set(members) => members,
        other => return Err(path_error(format!("label set is {}", other.type_name()), at)),
    };
    members
        .into_iter()
        .map(|m| match m {
            Value::String(s) => Ok(s),
            other => Err(path_error(format!("label is {}", other.type_name()), at)),
        })
        .collect()
}

fn path_error(
    reason: String,
    at: usize,
) -> GraphBinaryError {
    GraphBinaryError::malformed("Path", reason).with_offset(at)
}
