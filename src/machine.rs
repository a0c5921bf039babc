/*!
machine.rs - Machine context: CPU, bus, and configuration as one value.

Overview
========
`Machine` is the single owner of everything one emulated program touches.
It lays out the stack and interrupt-vector table from `MachineConfig`,
loads an image at address 0, and drives the CPU.

Run contract
============
`run()` steps until one of:
- the halt byte is fetched                       => `StopReason::Halted`
- `max_steps` instructions have executed         => `StopReason::StepLimit`
- an instruction faults                          => `Err(MachineFault)`

A fault carries the PC of the faulting instruction. Machine state is left
as it was at the fault so `dump` shows where things went wrong.
*/

use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::bus::{Bus, Console};
use crate::config::MachineConfig;
use crate::cpu::interrupt::vector_slot;
use crate::cpu::{Cpu, StepOutcome};
use crate::error::{ConfigError, FaultKind, MachineFault};

const DUMP_RULE: &str = "====================";
const DUMP_REGS_PER_ROW: usize = 8;

/// Why `Machine::run` returned normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Halted,
    StepLimit,
}

#[derive(Debug)]
pub struct Machine {
    cpu: Cpu,
    bus: Bus,
    config: MachineConfig,
    steps: u64,
}

impl Machine {
    /// Build a machine whose console writes to stdout.
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        Self::build(config, Console::stdout())
    }

    /// Build a machine whose console writes to `writer`.
    pub fn with_console(
        config: MachineConfig,
        writer: impl Write + 'static,
    ) -> Result<Self, ConfigError> {
        Self::build(config, Console::new(writer))
    }

    fn build(config: MachineConfig, console: Console) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = usize::try_from(config.memory_size)
            .map_err(|_| ConfigError::Invalid("memory_size overflows usize".into()))?;
        let bus = Bus::with_console(size, console);

        let mut cpu = Cpu::new();
        cpu.set_sp(config.stack_top());
        cpu.set_ip(config.vector_base());
        debug!(
            memory_size = config.memory_size,
            sp = cpu.sp(),
            ip = cpu.ip(),
            "machine initialized"
        );

        Ok(Self {
            cpu,
            bus,
            config,
            steps: 0,
        })
    }

    // ---------------------------------------------------------------------
    // Setup
    // ---------------------------------------------------------------------

    /// Copy `image` to address 0.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), MachineFault> {
        self.bus
            .memory_mut()
            .load_image(image)
            .map_err(|kind| MachineFault::new(0, kind))?;
        debug!(bytes = image.len(), "image loaded");
        Ok(())
    }

    /// Point vector `number` at `handler`.
    pub fn install_interrupt(&mut self, number: u8, handler: u64) -> Result<(), MachineFault> {
        let slot = vector_slot(self.cpu.ip(), number);
        self.bus
            .write_word(slot, handler)
            .map_err(|kind| MachineFault::new(self.cpu.pc(), kind))
    }

    /// Current handler address in vector `number`.
    pub fn interrupt_handler(&self, number: u8) -> Result<u64, MachineFault> {
        self.bus
            .read_word(vector_slot(self.cpu.ip(), number))
            .map_err(|kind| MachineFault::new(self.cpu.pc(), kind))
    }

    pub fn push(&mut self, v: u64) -> Result<(), MachineFault> {
        let pc = self.cpu.pc();
        self.cpu
            .push(&mut self.bus, v)
            .map_err(|kind| MachineFault::new(pc, kind))
    }

    pub fn pop(&mut self) -> Result<u64, MachineFault> {
        let pc = self.cpu.pc();
        self.cpu
            .pop(&mut self.bus)
            .map_err(|kind| MachineFault::new(pc, kind))
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<StepOutcome, MachineFault> {
        let pc = self.cpu.pc();
        let outcome = self
            .cpu
            .step(&mut self.bus)
            .map_err(|kind| MachineFault::new(pc, kind))?;
        if let StepOutcome::Executed(_) = outcome {
            self.steps += 1;
        }
        Ok(outcome)
    }

    /// Step until halt, the step limit, or a fault.
    pub fn run(&mut self) -> Result<StopReason, MachineFault> {
        let result = self.run_loop();
        let flushed = self.bus.console_mut().flush();
        match result {
            Ok(reason) => {
                flushed.map_err(|e| {
                    MachineFault::new(self.cpu.pc(), FaultKind::ConsoleWrite(e.to_string()))
                })?;
                info!(?reason, steps = self.steps, pc = self.cpu.pc(), "stopped");
                Ok(reason)
            }
            Err(fault) => {
                if let Err(e) = flushed {
                    warn!(error = %e, "console flush failed after fault");
                }
                warn!(%fault, steps = self.steps, "fault");
                Err(fault)
            }
        }
    }

    fn run_loop(&mut self) -> Result<StopReason, MachineFault> {
        loop {
            if let Some(max) = self.config.max_steps {
                if self.steps >= max {
                    return Ok(StopReason::StepLimit);
                }
            }
            match self.step()? {
                StepOutcome::Executed(_) => {}
                StepOutcome::Halted => return Ok(StopReason::Halted),
            }
        }
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Write the special registers and the register file to `out`.
    pub fn dump(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{DUMP_RULE}")?;
        writeln!(out, "PC={:016x}", self.cpu.pc())?;
        writeln!(out, "SP={:016x}", self.cpu.sp())?;
        writeln!(out, "IP={:016x}", self.cpu.ip())?;
        writeln!(out, "CR={:016x}", self.cpu.cr())?;
        writeln!(out)?;
        for (row, chunk) in self.cpu.registers().chunks(DUMP_REGS_PER_ROW).enumerate() {
            let base = row * DUMP_REGS_PER_ROW;
            let line = chunk
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:>2x}={v:016x}", base + i))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}
