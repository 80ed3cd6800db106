//! Wire-level tests of the bytecode serializer.

use graphbinary::{
    codec::serializers::{read_bytecode, write_bytecode},
    from_bytes, to_bytes, Bytecode, Cursor, DataType, GraphBinaryError, Instruction, Reader,
    TypeRegistry, Value, Writer,
};
use proptest::prelude::*;

mod generators;
use generators::bytecode_strategy;

fn encode_value_only(bc: &Bytecode) -> Vec<u8> {
    let mut w = Writer::new(TypeRegistry::global());
    write_bytecode(bc, &mut w).unwrap().to_vec()
}

/// Checks the exact bytes of `addV("person")` with no sources.
#[test]
fn test_add_v_person_layout() {
    let mut bc = Bytecode::new();
    bc.add_step("addV", ["person"]);

    let mut expected = vec![0x00, 0x00, 0x00, 0x01];
    expected.extend([0x00, 0x00, 0x00, 0x04]);
    expected.extend(b"addV");
    expected.extend([0x00, 0x00, 0x00, 0x01]);
    expected.extend([0x03, 0x00, 0x00, 0x00, 0x00, 0x06]);
    expected.extend(b"person");
    expected.extend([0x00, 0x00, 0x00, 0x00]);

    assert_eq!(encode_value_only(&bc), expected);

    let mut fq = vec![DataType::Bytecode.tag(), 0x00];
    fq.extend(&expected);
    assert_eq!(to_bytes(&Value::Bytecode(bc.clone())).unwrap(), fq);
    assert_eq!(from_bytes(&fq).unwrap(), Value::Bytecode(bc));
}

/// Checks that an instruction without arguments writes a zero count and
/// nothing else.
#[test]
fn test_zero_argument_step_is_bare_count() {
    let mut bc = Bytecode::new();
    bc.add_step("V", Vec::<Value>::new());

    let bytes = encode_value_only(&bc);
    assert_eq!(
        bytes,
        vec![
            0x00, 0x00, 0x00, 0x01, // steps
            0x00, 0x00, 0x00, 0x01, b'V', // operator
            0x00, 0x00, 0x00, 0x00, // arguments
            0x00, 0x00, 0x00, 0x00, // sources
        ]
    );
}

#[test]
fn test_empty_bytecode_is_two_zero_counts() {
    let bytes = encode_value_only(&Bytecode::new());
    assert_eq!(bytes, vec![0; 8]);

    let mut reader = Reader::new(TypeRegistry::global());
    let mut cursor = Cursor::new(&bytes);
    assert_eq!(read_bytecode(&mut cursor, &mut reader).unwrap(), Bytecode::new());
    assert!(cursor.is_exhausted());
}

/// Checks that steps and sources keep their order, and that sources are
/// written after steps.
#[test]
fn test_steps_and_sources_keep_order() {
    let bc = Bytecode::new()
        .with_source(Instruction::new("withSack", vec![Value::Int(1)]))
        .with_source(Instruction::new("withSideEffect", vec!["a".into(), Value::Long(2)]))
        .with_step(Instruction::new("V", vec![]))
        .with_step(Instruction::new("out", vec!["knows".into()]))
        .with_step(Instruction::new("limit", vec![Value::Long(10)]));

    let bytes = encode_value_only(&bc);
    let pos = |needle: &[u8]| {
        bytes
            .windows(needle.len())
            .position(|w| w == needle)
            .unwrap()
    };
    assert!(pos(b"out") < pos(b"limit"));
    assert!(pos(b"limit") < pos(b"withSack"));
    assert!(pos(b"withSack") < pos(b"withSideEffect"));

    let decoded = read_bytecode(&mut Cursor::new(&bytes), &mut Reader::new(TypeRegistry::global()))
        .unwrap();
    assert_eq!(decoded, bc);
}

/// Checks that arguments may be any value, including nested bytecode and
/// nulls.
#[test]
fn test_heterogeneous_arguments() {
    let mut inner = Bytecode::new();
    inner.add_step("out", Vec::<Value>::new());

    let mut bc = Bytecode::new();
    bc.add_step(
        "where",
        [
            Value::Bytecode(inner),
            Value::NULL,
            Value::Null(DataType::Int),
            Value::List(vec![Value::Boolean(true), Value::Char('x')]),
        ],
    );

    let bytes = to_bytes(&Value::Bytecode(bc.clone())).unwrap();
    assert_eq!(from_bytes(&bytes).unwrap(), Value::Bytecode(bc));
}

/// Checks that a negative step count is rejected at its offset.
#[test]
fn test_negative_count_is_malformed() {
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF];
    let err = read_bytecode(&mut Cursor::new(&bytes), &mut Reader::new(TypeRegistry::global()))
        .unwrap_err();
    assert!(matches!(err, GraphBinaryError::MalformedValue { .. }), "{err}");
    assert_eq!(err.offset(), Some(0));
}

/// Checks that an argument with an unassigned tag reports the tag and its
/// offset.
#[test]
fn test_argument_with_unknown_tag_is_unknown_type() {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x01];
    bytes.extend([0x00, 0x00, 0x00, 0x01, b'V']);
    bytes.extend([0x00, 0x00, 0x00, 0x01]);
    bytes.extend([0x10, 0x00]);

    let err = read_bytecode(&mut Cursor::new(&bytes), &mut Reader::new(TypeRegistry::global()))
        .unwrap_err();
    assert_eq!(err, GraphBinaryError::UnknownType { tag: 0x10, offset: 13 });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Checks the round trip of bytecode with arbitrary arguments.
    #[test]
    fn prop_bytecode_roundtrip(bc in bytecode_strategy()) {
        let bytes = encode_value_only(&bc);
        let mut cursor = Cursor::new(&bytes);
        let decoded = read_bytecode(&mut cursor, &mut Reader::new(TypeRegistry::global()))?;
        prop_assert!(cursor.is_exhausted());
        prop_assert_eq!(decoded, bc);
    }
}
