/*!
asm.rs - Line-oriented assembler producing loadable images.

Syntax
======
One instruction per line:

```text
; comment
LI 0, #1          ; r0 = 1
LI 1, $41         ; r1 = 0x41
INT 1
BAL r3, r4, r5
```

- Mnemonics are case-insensitive and resolve through `isa::Opcode`, the
  same table the decoder uses.
- Register operands are decimal, optionally prefixed with `r`/`R`, and keep
  only their low 8 bits.
- Immediates are `#<decimal>` (may be negative, stored as two's complement)
  or `$<hex>`, truncated to 64 bits and emitted big-endian.
- Text from `;` to the end of the line is ignored; so are blank lines.

The halt byte has no mnemonic. Images end at the last instruction, and
since memory is zero-filled past the image, running off the end of a
program halts.
*/

use tracing::debug;

use crate::error::{AsmError, AsmErrorReason};
use crate::isa::{Instruction, OpClass, Opcode, Operands};

const COMMENT: char = ';';

/// Assemble `source` into a flat image to be loaded at address 0.
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    let mut image = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = match raw.find(COMMENT) {
            Some(at) => &raw[..at],
            None => raw,
        }
        .trim();
        if text.is_empty() {
            continue;
        }
        let inst = parse_line(text).map_err(|reason| AsmError { line, reason })?;
        inst.encode_into(&mut image);
    }
    debug!(bytes = image.len(), "assembled");
    Ok(image)
}

/// Parse one non-empty, comment-free line.
pub fn parse_line(text: &str) -> Result<Instruction, AsmErrorReason> {
    let (mnemonic, rest) = match text.split_once(char::is_whitespace) {
        Some((m, rest)) => (m, rest.trim()),
        None => (text, ""),
    };
    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| AsmErrorReason::UnknownMnemonic(mnemonic.to_string()))?;

    let args: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };

    let class = opcode.class();
    let expected = class.register_operands() + usize::from(class.has_immediate());
    if args.len() != expected {
        return Err(AsmErrorReason::OperandCount {
            mnemonic: opcode.mnemonic(),
            expected,
            actual: args.len(),
        });
    }

    let operands = match class {
        OpClass::ZeroOperand => Operands::None,
        OpClass::OneRegister => Operands::One(register(args[0])?),
        OpClass::TwoRegister => Operands::Two(register(args[0])?, register(args[1])?),
        OpClass::ThreeRegister => Operands::Three(
            register(args[0])?,
            register(args[1])?,
            register(args[2])?,
        ),
        OpClass::Immediate => Operands::Imm(register(args[0])?, immediate(args[1])?),
    };
    Ok(Instruction { opcode, operands })
}

fn register(text: &str) -> Result<u8, AsmErrorReason> {
    let digits = text
        .strip_prefix('r')
        .or_else(|| text.strip_prefix('R'))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AsmErrorReason::BadRegister(text.to_string()));
    }
    // Arbitrarily long numbers keep their low byte.
    let low = digits
        .bytes()
        .fold(0u32, |acc, b| (acc * 10 + u32::from(b - b'0')) & 0xFF);
    Ok(low as u8)
}

fn immediate(text: &str) -> Result<u64, AsmErrorReason> {
    let bad = || AsmErrorReason::BadImmediate(text.to_string());
    if let Some(dec) = text.strip_prefix('#') {
        let (negative, digits) = match dec.strip_prefix('-') {
            Some(d) => (true, d),
            None => (false, dec),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let magnitude = digits
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0')));
        Ok(if negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        })
    } else if let Some(hex) = text.strip_prefix('$') {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        // Only the last 16 digits survive truncation to 64 bits.
        let tail = &hex[hex.len().saturating_sub(16)..];
        u64::from_str_radix(tail, 16).map_err(|_| bad())
    } else {
        Err(bad())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::enc;

    #[test]
    fn assembles_putchar_program() {
        let src = "\
; print 'A'
LI 0, #1
LI 1, $41

INT 1
";
        let mut expected = enc::li(0, 1);
        expected.extend(enc::li(1, 0x41));
        expected.extend(enc::one(Opcode::Int, 1));
        assert_eq!(assemble(src).unwrap(), expected);
    }

    #[test]
    fn operand_syntax_variants() {
        let image = assemble("bal r3, R4, 5  ; trailing comment\nnop").unwrap();
        let mut expected = enc::three(Opcode::Bal, 3, 4, 5);
        expected.extend(enc::nop());
        assert_eq!(image, expected);
    }

    #[test]
    fn registers_keep_low_byte() {
        assert_eq!(assemble("NOT 257").unwrap(), enc::one(Opcode::Not, 1));
    }

    #[test]
    fn immediates_are_big_endian_and_truncated() {
        assert_eq!(assemble("LI 2, #-1").unwrap(), enc::li(2, u64::MAX));
        assert_eq!(
            assemble("LI 2, $1FFEEDDCCBBAA99887766").unwrap(),
            enc::li(2, 0xDDCC_BBAA_9988_7766)
        );
        assert_eq!(
            assemble("LI 2, #18446744073709551617").unwrap(),
            enc::li(2, 1)
        );
    }

    #[test]
    fn display_output_reassembles() {
        let inst = Instruction {
            opcode: Opcode::Li,
            operands: Operands::Imm(7, 0xDEAD_BEEF),
        };
        assert_eq!(assemble(&inst.to_string()).unwrap(), inst.encode());
        let inst = Instruction {
            opcode: Opcode::Lum,
            operands: Operands::Three(1, 2, 3),
        };
        assert_eq!(assemble(&inst.to_string()).unwrap(), inst.encode());
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = assemble("NOP\n\nFOO 1").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.reason, AsmErrorReason::UnknownMnemonic("FOO".into()));

        let err = assemble("A 1").unwrap_err();
        assert_eq!(
            err.reason,
            AsmErrorReason::OperandCount {
                mnemonic: "A",
                expected: 2,
                actual: 1
            }
        );

        let err = assemble("NOP\nL 1, x").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.reason, AsmErrorReason::BadRegister("x".into()));

        let err = assemble("LI 1, 42").unwrap_err();
        assert_eq!(err.reason, AsmErrorReason::BadImmediate("42".into()));
        assert_eq!(
            err.to_string(),
            "line 1: expected immediate #num or $num, got '42'"
        );
    }
}
