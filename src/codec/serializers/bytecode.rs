//! Traversal program codec.
//!
//! ```text
//! [step count][step]...[source count][source]...
//! step/source := [operator String][argument count][fq argument]...
//! ```
//!
//! Any failure inside an instruction releases every segment already written
//! for the program before the error propagates.

use graphbinary_error::GraphBinaryResult;

use super::mismatch;
use crate::{
    codec::{CompositeBufferBuilder, Cursor, DataType, OutputBuffer, Reader, SerializerEntry, Writer},
    types::{Bytecode, Instruction, Value},
};

pub(super) const ENTRIES: &[SerializerEntry] = &[SerializerEntry::new(
    DataType::Bytecode,
    write_bytecode_value,
    read_bytecode_value,
)];

fn write_bytecode_value(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::Bytecode(bc) => write_bytecode(bc, w),
        other => Err(mismatch(DataType::Bytecode, other)),
    }
}

fn read_bytecode_value(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    read_bytecode(c, r).map(Value::Bytecode)
}

/// Value-only payload of `bytecode`.
pub fn write_bytecode(
    bytecode: &Bytecode,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let expected = 2 + 2 * (bytecode.steps.len() + bytecode.sources.len());
    w.composite(expected, |w, b| {
        write_instructions(&bytecode.steps, "Bytecode steps", w, b)?;
        write_instructions(&bytecode.sources, "Bytecode sources", w, b)
    })
}

fn write_instructions(
    instructions: &[Instruction],
    what: &str,
    w: &mut Writer<'_>,
    b: &mut CompositeBufferBuilder,
) -> GraphBinaryResult<()> {
    b.append_buffer(w.write_count(instructions.len(), what)?);
    for instruction in instructions {
        b.append_buffer(w.write_string(&instruction.operator)?);
        b.append_buffer(write_arguments(&instruction.arguments, w)?);
    }
    Ok(())
}

fn write_arguments(
    arguments: &[Value],
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    // No arguments: the count alone, same bytes as the general path.
    if arguments.is_empty() {
        return w.write_count(0, "Instruction arguments");
    }
    w.composite(1 + arguments.len(), |w, b| {
        b.append_buffer(w.write_count(arguments.len(), "Instruction arguments")?);
        for argument in arguments {
            b.append_buffer(w.encode(argument)?);
        }
        Ok(())
    })
}

/// Reads a value-only Bytecode payload.
pub fn read_bytecode(
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Bytecode> {
    let steps = read_instructions(c, r, "Bytecode steps")?;
    let sources = read_instructions(c, r, "Bytecode sources")?;
    Ok(Bytecode { steps, sources })
}

fn read_instructions(
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
    what: &'static str,
) -> GraphBinaryResult<Vec<Instruction>> {
    let count = c.read_length(what)?;
    let mut instructions = Vec::with_capacity(r.capacity_hint(count));
    for _ in 0..count {
        let operator = c.read_string("Instruction operator")?;
        let argc = c.read_length("Instruction arguments")?;
        let arguments = r.decode_many(argc, c)?;
        instructions.push(Instruction {
            operator,
            arguments,
        });
    }
    Ok(instructions)
}
