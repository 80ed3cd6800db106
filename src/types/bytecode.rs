use super::Value;
use crate::codec::DataType;

/// Single traversal step or source: an operator name plus its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub operator: String,
    pub arguments: Vec<Value>,
}

impl Instruction {
    pub fn new(
        operator: impl Into<String>,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            operator: operator.into(),
            arguments,
        }
    }
}

/// Serialized traversal program.
///
/// Steps and sources are kept in insertion order; the encoder writes them in
/// that order and the decoder restores it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    pub steps: Vec<Instruction>,
    pub sources: Vec<Instruction>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(
        mut self,
        step: Instruction,
    ) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_source(
        mut self,
        source: Instruction,
    ) -> Self {
        self.sources.push(source);
        self
    }

    /// Appends a step built from an operator and its arguments.
    pub fn add_step<I, V>(
        &mut self,
        operator: impl Into<String>,
        arguments: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.steps.push(Instruction::new(
            operator,
            arguments.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn add_source<I, V>(
        &mut self,
        operator: impl Into<String>,
        arguments: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.sources.push(Instruction::new(
            operator,
            arguments.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.sources.is_empty()
    }
}

/// Named parameter substituted by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub key: String,
    pub value: Box<Value>,
}

impl Binding {
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

/// Script fragment evaluated remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    pub language: String,
    pub script: String,
    /// Number of arguments the script takes; `-1` when variadic.
    pub arguments: i32,
}

impl Lambda {
    pub fn new(
        language: impl Into<String>,
        script: impl Into<String>,
        arguments: i32,
    ) -> Self {
        Self {
            language: language.into(),
            script: script.into(),
            arguments,
        }
    }
}

/// Named predicate (`P` or `TextP`) with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub operator: String,
    pub values: Vec<Value>,
}

impl Predicate {
    pub fn new<I, V>(
        operator: impl Into<String>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            operator: operator.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Enumeration families whose members travel as a bare name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Barrier,
    Cardinality,
    Column,
    Direction,
    Operator,
    Order,
    Pick,
    Pop,
    Scope,
    T,
}

impl EnumKind {
    pub const ALL: [EnumKind; 10] = [
        EnumKind::Barrier,
        EnumKind::Cardinality,
        EnumKind::Column,
        EnumKind::Direction,
        EnumKind::Operator,
        EnumKind::Order,
        EnumKind::Pick,
        EnumKind::Pop,
        EnumKind::Scope,
        EnumKind::T,
    ];

    pub const fn data_type(self) -> DataType {
        match self {
            EnumKind::Barrier => DataType::Barrier,
            EnumKind::Cardinality => DataType::Cardinality,
            EnumKind::Column => DataType::Column,
            EnumKind::Direction => DataType::Direction,
            EnumKind::Operator => DataType::Operator,
            EnumKind::Order => DataType::Order,
            EnumKind::Pick => DataType::Pick,
            EnumKind::Pop => DataType::Pop,
            EnumKind::Scope => DataType::Scope,
            EnumKind::T => DataType::T,
        }
    }

    pub fn from_data_type(dt: DataType) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.data_type() == dt)
    }
}

/// Member of one of the [`EnumKind`] families, e.g. `Direction.OUT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub kind: EnumKind,
    pub name: String,
}

impl EnumValue {
    pub fn new(
        kind: EnumKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}
