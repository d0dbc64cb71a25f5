#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_onewire::{
    ONEWIRE_MATCH_ROM_CMD, ONEWIRE_SEARCH_CMD, ONEWIRE_SKIP_ROM_CMD, OneWire, OneWireCrc,
    OneWireResult, OneWireStatus, RomCode,
};
use tstick::consts::{IS_DS28EA00_SENSOR, PIO_ACCESS_WRITE, VALID_SEQUENCE};

const WRITE_SCRATCHPAD: u8 = 0x4e;
const READ_SCRATCHPAD: u8 = 0xbe;
const CONVERT_T: u8 = 0x44;
const PIO_ACCESS_READ: u8 = 0xf5;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Presence(bool);

impl OneWireStatus for Presence {
    fn presence(&self) -> bool {
        self.0
    }

    fn shortcircuit(&self) -> bool {
        false
    }
}

/// A simulated DS28EA00 (or any other family when built with [`SimDevice::other`]).
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub rom: RomCode,
    pub scratchpad: [u8; 9],
    pub latch: u8,
    pub corrupt_crc: bool,
    pub bad_confirm: bool,
}

impl SimDevice {
    pub fn new(serial: u8, raw_temp: i16) -> Self {
        Self::with_family(IS_DS28EA00_SENSOR, serial, raw_temp)
    }

    pub fn other(family: u8, serial: u8) -> Self {
        Self::with_family(family, serial, 0)
    }

    fn with_family(family: u8, serial: u8, raw_temp: i16) -> Self {
        let mut dev = Self {
            rom: RomCode::from_parts(family, [serial, 0x5a, 0x00, 0x00, 0x00, 0x00]),
            scratchpad: [0, 0, 85, (-40i8) as u8, 0x7f, 0xff, 0x0c, 0x10, 0],
            latch: 0xff,
            corrupt_crc: false,
            bad_confirm: false,
        };
        dev.set_temp(raw_temp);
        dev
    }

    pub fn set_temp(&mut self, raw_temp: i16) {
        let [lsb, msb] = raw_temp.to_le_bytes();
        self.scratchpad[0] = lsb;
        self.scratchpad[1] = msb;
        self.update_crc();
    }

    fn update_crc(&mut self) {
        self.scratchpad[8] = OneWireCrc::checksum(&self.scratchpad[..8]);
    }

    /// Status byte: PIOA pin, PIOA latch, PIOB pin, PIOB latch; complement on top.
    pub fn pio_status(&self) -> u8 {
        let a = self.latch & 0x1;
        let b = (self.latch >> 1) & 0x1;
        let low = a | (a << 1) | (b << 2) | (b << 3);
        low | ((!low & 0x0f) << 4)
    }

    fn scratchpad_out(&self) -> [u8; 9] {
        let mut out = self.scratchpad;
        if self.corrupt_crc {
            out[8] ^= 0x5a;
        }
        out
    }
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Rom,
    Search {
        active: Vec<bool>,
        bit: usize,
        complement: bool,
    },
    Match(Vec<u8>),
    Function(Vec<usize>),
    Args {
        selected: Vec<usize>,
        cmd: u8,
        args: Vec<u8>,
    },
}

/// A bus of simulated devices. Reads of undriven slots return 1s and
/// concurrent answers are wired-AND.
#[derive(Debug, Default)]
pub struct SimBus {
    pub devices: Vec<SimDevice>,
    /// Every byte written by the master.
    pub written: Vec<u8>,
    pub resets: usize,
    pub conversions: usize,
    phase: Phase,
    out: VecDeque<u8>,
}

impl SimBus {
    pub fn new(devices: Vec<SimDevice>) -> Self {
        Self {
            devices,
            ..Default::default()
        }
    }

    /// ROM codes in the order a search discovers them.
    pub fn search_order(&self) -> Vec<RomCode> {
        let mut roms: Vec<_> = self.devices.iter().map(|d| d.rom).collect();
        roms.sort_by_key(|r| u64::from(*r).reverse_bits());
        roms
    }

    pub fn device(&self, rom: &RomCode) -> &SimDevice {
        self.devices.iter().find(|d| d.rom == *rom).expect("unknown ROM")
    }

    pub fn device_mut(&mut self, rom: &RomCode) -> &mut SimDevice {
        self.devices
            .iter_mut()
            .find(|d| d.rom == *rom)
            .expect("unknown ROM")
    }

    fn bit_of(rom: &RomCode, bit: usize) -> bool {
        rom.as_bytes()[bit / 8] & (1 << (bit % 8)) != 0
    }

    fn answer<const L: usize>(&mut self, selected: &[usize], f: impl Fn(&SimDevice) -> [u8; L]) {
        if selected.is_empty() {
            return;
        }
        let mut out = [0xff; L];
        for &i in selected {
            for (o, b) in out.iter_mut().zip(f(&self.devices[i])) {
                *o &= b;
            }
        }
        self.out.extend(out);
    }

    fn function(&mut self, selected: Vec<usize>, cmd: u8) -> Phase {
        match cmd {
            READ_SCRATCHPAD => {
                self.answer(&selected, SimDevice::scratchpad_out);
                Phase::Idle
            }
            PIO_ACCESS_READ => {
                self.answer(&selected, |d| [d.pio_status()]);
                Phase::Idle
            }
            CONVERT_T => {
                self.conversions += 1;
                Phase::Idle
            }
            WRITE_SCRATCHPAD | PIO_ACCESS_WRITE => Phase::Args {
                selected,
                cmd,
                args: Vec::new(),
            },
            _ => Phase::Idle,
        }
    }

    fn arguments(&mut self, selected: Vec<usize>, cmd: u8, args: Vec<u8>) -> Phase {
        match (cmd, args.len()) {
            (WRITE_SCRATCHPAD, 3) => {
                for &i in &selected {
                    let dev = &mut self.devices[i];
                    dev.scratchpad[2..5].copy_from_slice(&args);
                    dev.update_crc();
                }
                Phase::Idle
            }
            (PIO_ACCESS_WRITE, 2) => {
                if args[1] == !args[0] {
                    for &i in &selected {
                        self.devices[i].latch = args[0];
                    }
                    self.answer(&selected, |d| {
                        let confirm = if d.bad_confirm { 0x00 } else { VALID_SEQUENCE };
                        [confirm, d.pio_status()]
                    });
                }
                Phase::Idle
            }
            _ => Phase::Args {
                selected,
                cmd,
                args,
            },
        }
    }
}

impl OneWire for SimBus {
    type Status = Presence;
    type BusError = ();

    fn reset(&mut self) -> OneWireResult<Presence, ()> {
        self.resets += 1;
        self.out.clear();
        self.phase = Phase::Rom;
        Ok(Presence(!self.devices.is_empty()))
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), ()> {
        self.written.push(byte);
        self.phase = match std::mem::take(&mut self.phase) {
            Phase::Rom => match byte {
                ONEWIRE_SEARCH_CMD => Phase::Search {
                    active: vec![true; self.devices.len()],
                    bit: 0,
                    complement: false,
                },
                ONEWIRE_MATCH_ROM_CMD => Phase::Match(Vec::new()),
                ONEWIRE_SKIP_ROM_CMD => Phase::Function((0..self.devices.len()).collect()),
                _ => Phase::Idle,
            },
            Phase::Match(mut buf) => {
                buf.push(byte);
                if buf.len() == RomCode::LEN {
                    let selected = self
                        .devices
                        .iter()
                        .enumerate()
                        .filter(|(_, d)| d.rom.as_bytes()[..] == buf[..])
                        .map(|(i, _)| i)
                        .collect();
                    Phase::Function(selected)
                } else {
                    Phase::Match(buf)
                }
            }
            Phase::Function(selected) => self.function(selected, byte),
            Phase::Args {
                selected,
                cmd,
                mut args,
            } => {
                args.push(byte);
                self.arguments(selected, cmd, args)
            }
            _ => Phase::Idle,
        };
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, ()> {
        Ok(self.out.pop_front().unwrap_or(0xff))
    }

    fn write_bit(&mut self, dir: bool) -> OneWireResult<(), ()> {
        if let Phase::Search { active, bit, .. } = &mut self.phase {
            for (a, dev) in active.iter_mut().zip(&self.devices) {
                if Self::bit_of(&dev.rom, *bit) != dir {
                    *a = false;
                }
            }
            *bit += 1;
        }
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, ()> {
        let Phase::Search {
            active,
            bit,
            complement,
        } = &mut self.phase
        else {
            return Ok(true);
        };
        let out = self
            .devices
            .iter()
            .zip(active.iter())
            .filter(|(_, a)| **a)
            .all(|(dev, _)| Self::bit_of(&dev.rom, *bit) != *complement);
        *complement = !*complement;
        Ok(out)
    }
}
