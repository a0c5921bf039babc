/*!
execute.rs - Instruction semantic helpers (stack, compare, branch, ALU)

Purpose
=======
Centralize side-effect logic so every dispatch family shares a single
implementation. All helpers are generic over `CpuRegs`; the ones that touch
memory take `&mut Bus` explicitly and propagate its faults.

Scope (crate-visible)
---------------------
Stack:
    push, pop
Condition register:
    compare_signed, compare_unsigned, branch_condition
Control transfer:
    check_target
ALU:
    div_signed, div_unsigned, shift_left, shift_right
Masked memory:
    merge_masked

Stack Convention
================
The stack grows toward lower addresses. `push` pre-decrements SP by one
word then stores; `pop` loads then post-increments. Overflow and underflow
surface as addressing faults from the bus, never as silent wraparound
corruption.
*/

use std::cmp::Ordering;

use crate::bus::{Bus, WORD_BYTES};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{EQUAL, GREATER_THAN, LESS_THAN};
use crate::error::FaultKind;

// ---------------------------------------------------------------------------
// Stack helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u64) -> Result<(), FaultKind> {
    let sp = cpu.sp().wrapping_sub(WORD_BYTES);
    bus.write_word(sp, v)?;
    cpu.set_sp(sp);
    Ok(())
}

#[inline]
pub(crate) fn pop<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> Result<u64, FaultKind> {
    let sp = cpu.sp();
    let v = bus.read_word(sp)?;
    cpu.set_sp(sp.wrapping_add(WORD_BYTES));
    Ok(v)
}

// ---------------------------------------------------------------------------
// Condition register
// ---------------------------------------------------------------------------

#[inline]
fn flag_for(ord: Ordering) -> u64 {
    match ord {
        Ordering::Less => LESS_THAN,
        Ordering::Greater => GREATER_THAN,
        Ordering::Equal => EQUAL,
    }
}

/// CP: signed compare, leaves exactly one comparison flag set.
#[inline]
pub(crate) fn compare_signed<C: CpuRegs>(cpu: &mut C, a: u64, b: u64) {
    cpu.set_compare_flag(flag_for((a as i64).cmp(&(b as i64))));
}

/// CPU: unsigned compare, leaves exactly one comparison flag set.
#[inline]
pub(crate) fn compare_unsigned<C: CpuRegs>(cpu: &mut C, a: u64, b: u64) {
    cpu.set_compare_flag(flag_for(a.cmp(&b)));
}

/// Branch test: taken when every bit of `condition` is set in CR.
#[inline]
pub(crate) fn branch_condition<C: CpuRegs>(cpu: &C, condition: u64) -> bool {
    cpu.cr_covers(condition)
}

// ---------------------------------------------------------------------------
// Control transfer
// ---------------------------------------------------------------------------

/// Pass `target` through if it addresses a byte of memory, else fault.
///
/// Every PC-loading instruction checks its target before any other effect,
/// so a bad jump faults at the jump itself with state untouched.
#[inline]
pub(crate) fn check_target(bus: &Bus, target: u64) -> Result<u64, FaultKind> {
    bus.read(target).map(|_| target)
}

// ---------------------------------------------------------------------------
// ALU
// ---------------------------------------------------------------------------

/// Signed (quotient, remainder), truncating toward zero.
#[inline]
pub(crate) fn div_signed(a: u64, b: u64) -> Result<(u64, u64), FaultKind> {
    let (a, b) = (a as i64, b as i64);
    if b == 0 {
        return Err(FaultKind::DivisionByZero);
    }
    // i64::MIN / -1 wraps back to i64::MIN with remainder 0.
    Ok((a.wrapping_div(b) as u64, a.wrapping_rem(b) as u64))
}

#[inline]
pub(crate) fn div_unsigned(a: u64, b: u64) -> Result<(u64, u64), FaultKind> {
    if b == 0 {
        return Err(FaultKind::DivisionByZero);
    }
    Ok((a / b, a % b))
}

/// Logical shift left; a count of 64 or more clears the value.
#[inline]
pub(crate) fn shift_left(v: u64, count: u64) -> u64 {
    u32::try_from(count)
        .ok()
        .and_then(|c| v.checked_shl(c))
        .unwrap_or(0)
}

/// Logical shift right; a count of 64 or more clears the value.
#[inline]
pub(crate) fn shift_right(v: u64, count: u64) -> u64 {
    u32::try_from(count)
        .ok()
        .and_then(|c| v.checked_shr(c))
        .unwrap_or(0)
}

/// Take the `mask` bits from `incoming` and the rest from `base`.
#[inline]
pub(crate) fn merge_masked(base: u64, incoming: u64, mask: u64) -> u64 {
    (base & !mask) | (incoming & mask)
}
