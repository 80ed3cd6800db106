use super::Value;

/// Reference to a vertex at either end of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRef {
    pub id: Box<Value>,
    pub label: String,
}

impl ElementRef {
    pub fn new(
        id: impl Into<Value>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: Box<Value>,
    pub label: String,
    /// Written as null when empty.
    pub properties: Vec<VertexProperty>,
}

impl Vertex {
    pub fn new(
        id: impl Into<Value>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(
        mut self,
        property: VertexProperty,
    ) -> Self {
        self.properties.push(property);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: Box<Value>,
    pub label: String,
    pub in_v: ElementRef,
    pub out_v: ElementRef,
}

impl Edge {
    pub fn new(
        id: impl Into<Value>,
        label: impl Into<String>,
        out_v: ElementRef,
        in_v: ElementRef,
    ) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            in_v,
            out_v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexProperty {
    pub id: Box<Value>,
    pub label: String,
    pub value: Box<Value>,
}

impl VertexProperty {
    pub fn new(
        id: impl Into<Value>,
        label: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            value: Box::new(value.into()),
        }
    }
}

/// Key/value property of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Box<Value>,
}

impl Property {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            key: key.into(),
            value: Box::new(value.into()),
        }
    }
}

/// Walk through the graph; `labels[i]` belongs to `objects[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub labels: Vec<Vec<String>>,
    pub objects: Vec<Value>,
}

impl Path {
    pub fn push(
        &mut self,
        object: impl Into<Value>,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.objects.push(object.into());
        self.labels.push(labels.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Result object carrying its bulk (how many traversers it stands for).
#[derive(Debug, Clone, PartialEq)]
pub struct Traverser {
    pub bulk: i64,
    pub value: Box<Value>,
}

impl Traverser {
    pub fn new(
        bulk: i64,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            bulk,
            value: Box::new(value.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_push_pairs_labels_with_objects() {
        let mut path = Path::default();
        path.push(1i32, ["a"]);
        path.push("x", Vec::<String>::new());
        assert_eq!(path.len(), 2);
        assert_eq!(path.labels[0], vec!["a".to_string()]);
        assert!(path.labels[1].is_empty());
    }
}
