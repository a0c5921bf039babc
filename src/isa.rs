//! Instruction set definitions.
//!
//! The `define_opcodes!` invocation below is the single canonical opcode
//! table. It generates the [`Opcode`] enum, byte and mnemonic lookups, and is
//! shared by the decoder (`cpu::dispatch`) and the text assembler (`asm`), so
//! the two cannot disagree about encodings.
//!
//! # Encoding
//!
//! An instruction is one opcode byte followed by operand bytes. The operand
//! layout is selected by the opcode's high nibble, checked in this order:
//!
//! | high nibble | class          | width | operands                      |
//! |-------------|----------------|-------|-------------------------------|
//! | `0xF0`      | zero-operand   | 1     | none                          |
//! | `0x80`      | one-register   | 2     | `r`                           |
//! | `0xC0`      | three-register | 4     | `r1 r2 r3`                    |
//! | `0xE0`      | immediate      | 10    | `r` + 8-byte big-endian value |
//! | other       | two-register   | 3     | `r1 r2`                       |
//!
//! The byte `0x00` is not an instruction; the dispatcher treats it as halt.

use std::fmt;

use crate::error::FaultKind;

/// Opcode byte that stops the dispatcher.
pub const HALT: u8 = 0x00;

/// Operand-layout class selected by an opcode's high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    ZeroOperand,
    OneRegister,
    TwoRegister,
    ThreeRegister,
    Immediate,
}

impl OpClass {
    pub const NIBBLE_MASK: u8 = 0xF0;

    /// Classify an opcode byte by its high nibble.
    #[inline]
    pub fn of(opcode: u8) -> Self {
        match opcode & Self::NIBBLE_MASK {
            0xF0 => OpClass::ZeroOperand,
            0x80 => OpClass::OneRegister,
            0xC0 => OpClass::ThreeRegister,
            0xE0 => OpClass::Immediate,
            _ => OpClass::TwoRegister,
        }
    }

    /// Total encoded width in bytes, opcode included.
    #[inline]
    pub fn width(self) -> u64 {
        match self {
            OpClass::ZeroOperand => 1,
            OpClass::OneRegister => 2,
            OpClass::TwoRegister => 3,
            OpClass::ThreeRegister => 4,
            OpClass::Immediate => 10,
        }
    }

    /// Number of register-number operand bytes.
    #[inline]
    pub fn register_operands(self) -> usize {
        match self {
            OpClass::ZeroOperand => 0,
            OpClass::OneRegister | OpClass::Immediate => 1,
            OpClass::TwoRegister => 2,
            OpClass::ThreeRegister => 3,
        }
    }

    /// True if the class carries an 8-byte literal after its register operand.
    #[inline]
    pub fn has_immediate(self) -> bool {
        matches!(self, OpClass::Immediate)
    }
}

macro_rules! define_opcodes {
    ($( $(#[$doc:meta])* $name:ident = $byte:literal, $mnemonic:literal; )*) => {
        /// Every mapped opcode. Bytes absent from this enum are decode errors.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $( $(#[$doc])* $name = $byte, )*
        }

        impl Opcode {
            pub const ALL: &'static [Opcode] = &[ $( Opcode::$name, )* ];

            #[inline]
            pub fn byte(self) -> u8 {
                self as u8
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }

            /// Case-insensitive mnemonic lookup.
            pub fn from_mnemonic(text: &str) -> Option<Self> {
                $(
                    if text.eq_ignore_ascii_case($mnemonic) {
                        return Some(Opcode::$name);
                    }
                )*
                None
            }
        }

        impl TryFrom<u8> for Opcode {
            type Error = FaultKind;

            fn try_from(byte: u8) -> Result<Self, Self::Error> {
                match byte {
                    $( $byte => Ok(Opcode::$name), )*
                    _ => Err(FaultKind::UnknownOpcode { opcode: byte }),
                }
            }
        }
    };
}

define_opcodes! {
    // =========================
    // Zero-operand
    // =========================
    /// NOP
    Nop = 0xF1, "NOP";
    /// RET ; PC = pop()
    Ret = 0xF2, "RET";
    /// IL ; disable interrupt delivery
    Il = 0xF3, "IL";
    /// IU ; enable interrupt delivery
    Iu = 0xF4, "IU";

    // =========================
    // One-register
    // =========================
    /// INT n ; software interrupt n (the operand byte itself)
    Int = 0x81, "INT";
    /// LPC r ; r = PC
    Lpc = 0x82, "LPC";
    /// LSP r ; r = SP
    Lsp = 0x83, "LSP";
    /// LIP r ; r = IP
    Lip = 0x84, "LIP";
    /// LCR r ; r = CR
    Lcr = 0x85, "LCR";
    /// NOT r ; r = !r
    Not = 0x86, "NOT";
    /// PUS r ; push(r)
    Pus = 0x87, "PUS";
    /// POP r ; r = pop()
    Pop = 0x88, "POP";
    /// SIP r ; IP = r
    Sip = 0x89, "SIP";
    /// SSP r ; SP = r
    Ssp = 0x8A, "SSP";
    /// SCR r ; CR = r
    Scr = 0x8B, "SCR";

    // =========================
    // Two-register
    // =========================
    /// L rd, rs ; rd = rs
    L = 0x01, "L";
    /// LS rd, ra ; rd = mem8[ra]
    Ls = 0x02, "LS";
    /// ST rs, ra ; mem8[ra] = rs & 0xFF
    St = 0x03, "ST";
    /// A rd, rs ; rd = rd + rs (signed)
    A = 0x04, "A";
    /// AU rd, rs ; rd = rd + rs
    Au = 0x05, "AU";
    /// S rd, rs ; rd = rd - rs (signed)
    S = 0x06, "S";
    /// SU rd, rs ; rd = rd - rs
    Su = 0x07, "SU";
    /// M rd, rs ; rd = rd * rs (signed)
    M = 0x08, "M";
    /// MU rd, rs ; rd = rd * rs
    Mu = 0x09, "MU";
    /// AND rd, rs
    And = 0x0A, "AND";
    /// OR rd, rs
    Or = 0x0B, "OR";
    /// XOR rd, rs
    Xor = 0x0C, "XOR";
    /// B rc, rt ; if CR covers rc then PC = rt
    B = 0x0D, "B";
    /// BAS rc, rt ; if CR covers rc then push(PC), PC = rt
    Bas = 0x0E, "BAS";
    /// CP ra, rb ; signed compare into CR
    Cp = 0x0F, "CP";
    /// CPU ra, rb ; unsigned compare into CR
    Cpu = 0x10, "CPU";
    /// SHL rd, rs ; rd = rd << rs
    Shl = 0x11, "SHL";
    /// SHR rd, rs ; rd = rd >> rs (logical)
    Shr = 0x12, "SHR";

    // =========================
    // Three-register
    // =========================
    /// D rq, rs, rr ; signed rq = rq / rs, rr = rq % rs
    D = 0xC1, "D";
    /// DU rq, rs, rr ; unsigned divide with remainder
    Du = 0xC2, "DU";
    /// BAL rc, rt, rl ; if CR covers rc then rl = PC, PC = rt
    Bal = 0xC3, "BAL";
    /// LSM rf, rl, ra ; r[rf..=rl] = mem64[ra]
    Lsm = 0xC4, "LSM";
    /// STM rf, rl, ra ; mem64[ra] = r[rf..=rl]
    Stm = 0xC5, "STM";
    /// LUM rm, rv, ra ; rv = (rv & !rm) | (mem64[ra] & rm)
    Lum = 0xC6, "LUM";
    /// SUM rm, rv, ra ; mem64[ra] = (mem64[ra] & !rm) | (rv & rm)
    Sum = 0xC7, "SUM";

    // =========================
    // Immediate
    // =========================
    /// LI r, imm64 ; r = imm64
    Li = 0xE1, "LI";
}

impl Opcode {
    #[inline]
    pub fn class(self) -> OpClass {
        OpClass::of(self.byte())
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Operand fields of a decoded instruction, shaped by its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operands {
    None,
    One(u8),
    Two(u8, u8),
    Three(u8, u8, u8),
    Imm(u8, u64),
}

/// A fully decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Operands,
}

impl Instruction {
    /// Decode the instruction at the start of `bytes`.
    ///
    /// A slice shorter than the opcode's class width is reported as an
    /// `AddressOutOfRange` relative to the slice (`addr` 0, `size` its length).
    pub fn decode(bytes: &[u8]) -> Result<Self, FaultKind> {
        let short = |len: u64| FaultKind::AddressOutOfRange {
            addr: 0,
            len,
            size: bytes.len() as u64,
        };
        let first = *bytes.first().ok_or_else(|| short(1))?;
        let opcode = Opcode::try_from(first)?;
        let width = opcode.class().width();
        if (bytes.len() as u64) < width {
            return Err(short(width));
        }
        let operands = match opcode.class() {
            OpClass::ZeroOperand => Operands::None,
            OpClass::OneRegister => Operands::One(bytes[1]),
            OpClass::TwoRegister => Operands::Two(bytes[1], bytes[2]),
            OpClass::ThreeRegister => Operands::Three(bytes[1], bytes[2], bytes[3]),
            OpClass::Immediate => {
                let mut imm = [0u8; 8];
                imm.copy_from_slice(&bytes[2..10]);
                Operands::Imm(bytes[1], u64::from_be_bytes(imm))
            }
        };
        Ok(Self { opcode, operands })
    }

    #[inline]
    pub fn width(&self) -> u64 {
        self.opcode.class().width()
    }

    /// Append the encoded bytes of this instruction to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode.byte());
        match self.operands {
            Operands::None => {}
            Operands::One(r) => out.push(r),
            Operands::Two(a, b) => out.extend_from_slice(&[a, b]),
            Operands::Three(a, b, c) => out.extend_from_slice(&[a, b, c]),
            Operands::Imm(r, imm) => {
                out.push(r);
                out.extend_from_slice(&imm.to_be_bytes());
            }
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width() as usize);
        self.encode_into(&mut out);
        out
    }
}

/// Assembler-compatible rendering, e.g. `LI 5, $1122334455667788`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.opcode.mnemonic();
        match self.operands {
            Operands::None => write!(f, "{m}"),
            Operands::One(r) => write!(f, "{m} {r}"),
            Operands::Two(a, b) => write!(f, "{m} {a}, {b}"),
            Operands::Three(a, b, c) => write!(f, "{m} {a}, {b}, {c}"),
            Operands::Imm(r, imm) => write!(f, "{m} {r}, ${imm:X}"),
        }
    }
}
