use rand::RngCore;

use crate::constants::{FLAG_REGISTER, FONT_GLYPH_SIZE, FONT_START};
use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::graphics::Graphics;
use crate::instruction::Flow;
use crate::keypad::{Keypad, KeypadError};
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::state::State;

/// Everything an operation may touch, borrowed from the `Chip8` for the
/// duration of a single instruction.
pub struct Machine<'a> {
    pub state: &'a mut State,
    pub memory: &'a mut Memory,
    pub graphics: &'a mut Graphics,
    pub display: &'a mut dyn Display,
    pub keypad: &'a mut dyn Keypad,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> Machine<'a> {
    fn vx(&self, op: Opcode) -> u8 {
        self.state.v[op.x() as usize]
    }

    fn vy(&self, op: Opcode) -> u8 {
        self.state.v[op.y() as usize]
    }

    fn set_vx(&mut self, op: Opcode, value: u8) {
        self.state.v[op.x() as usize] = value;
    }

    /// Writes VF first and Vx second, so with x = F the result is what remains.
    fn set_vx_with_flag(&mut self, op: Opcode, value: u8, flag: bool) {
        self.state.v[FLAG_REGISTER] = flag as u8;
        self.set_vx(op, value);
    }

    fn render(&mut self) -> Result<()> {
        self.display.render(&*self.graphics)?;
        Ok(())
    }
}

/// clear
pub fn cls(_op: Opcode, m: &mut Machine) -> Result<Flow> {
    m.graphics.clear();
    m.render()?;
    Ok(Flow::Next)
}

/// PC = STACK.pop() + 2
pub fn ret(_op: Opcode, m: &mut Machine) -> Result<Flow> {
    let caller = m.state.pop()?;
    Ok(Flow::Jump(caller.wrapping_add(2)))
}

/// PC = addr
pub fn jp(op: Opcode, _m: &mut Machine) -> Result<Flow> {
    Ok(Flow::Jump(op.addr()))
}

/// STACK.push(PC); PC = addr
pub fn call(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let pc = m.state.pc;
    m.state.push(pc)?;
    Ok(Flow::Jump(op.addr()))
}

/// if Vx == kk then skip
pub fn se(op: Opcode, m: &mut Machine) -> Result<Flow> {
    Ok(Flow::Skip(m.vx(op) == op.kk()))
}

/// if Vx != kk then skip
pub fn sne(op: Opcode, m: &mut Machine) -> Result<Flow> {
    Ok(Flow::Skip(m.vx(op) != op.kk()))
}

/// if Vx == Vy then skip
pub fn se_reg(op: Opcode, m: &mut Machine) -> Result<Flow> {
    Ok(Flow::Skip(m.vx(op) == m.vy(op)))
}

/// Vx = kk
pub fn ld(op: Opcode, m: &mut Machine) -> Result<Flow> {
    m.set_vx(op, op.kk());
    Ok(Flow::Next)
}

/// Vx += kk
/// Wraps silently; VF is left alone
pub fn add(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let res = m.vx(op).wrapping_add(op.kk());
    m.set_vx(op, res);
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn ld_reg(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let vy = m.vy(op);
    m.set_vx(op, vy);
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let res = m.vx(op) | m.vy(op);
    m.set_vx(op, res);
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let res = m.vx(op) & m.vy(op);
    m.set_vx(op, res);
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let res = m.vx(op) ^ m.vy(op);
    m.set_vx(op, res);
    Ok(Flow::Next)
}

/// Vx += Vy; VF = carry
pub fn add_reg(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let (res, carry) = m.vx(op).overflowing_add(m.vy(op));
    m.set_vx_with_flag(op, res, carry);
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let (vx, vy) = (m.vx(op), m.vy(op));
    m.set_vx_with_flag(op, vx.wrapping_sub(vy), vx > vy);
    Ok(Flow::Next)
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let vx = m.vx(op);
    m.set_vx_with_flag(op, vx >> 1, vx & 0x01 == 0x01);
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let (vx, vy) = (m.vx(op), m.vy(op));
    m.set_vx_with_flag(op, vy.wrapping_sub(vx), vy > vx);
    Ok(Flow::Next)
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let vx = m.vx(op);
    m.set_vx_with_flag(op, vx << 1, vx & 0x80 == 0x80);
    Ok(Flow::Next)
}

/// if Vx != Vy then skip
pub fn sne_reg(op: Opcode, m: &mut Machine) -> Result<Flow> {
    Ok(Flow::Skip(m.vx(op) != m.vy(op)))
}

/// I = addr
pub fn ld_i(op: Opcode, m: &mut Machine) -> Result<Flow> {
    m.state.i = op.addr();
    Ok(Flow::Next)
}

/// PC = V0 + addr
pub fn jp_v0(op: Opcode, m: &mut Machine) -> Result<Flow> {
    Ok(Flow::Jump(op.addr() + u16::from(m.state.v[0x0])))
}

/// Vx = rand_byte & kk
pub fn rnd(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let rand_byte = (m.rng.next_u32() & 0xFF) as u8;
    m.set_vx(op, rand_byte & op.kk());
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n-byte sprite at memory[I..] onto the frame buffer at (Vx, Vy).
/// Sets VF if any pixels were erased
pub fn drw(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let sprite: Vec<u8> = (0..u16::from(op.n()))
        .map(|row| m.memory.read(m.state.i.wrapping_add(row)))
        .collect();
    let (x, y) = (m.vx(op) as usize, m.vy(op) as usize);
    let collision = m.graphics.draw_sprite(x, y, &sprite);
    m.state.v[FLAG_REGISTER] = collision as u8;
    m.render()?;
    Ok(Flow::Next)
}

/// if Vx.pressed then skip
pub fn skp(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let key = m.vx(op) & 0x0F;
    match m.keypad.is_pressed(key) {
        Ok(pressed) => Ok(Flow::Skip(pressed)),
        Err(err) => keypad_failure(err),
    }
}

/// if !Vx.pressed then skip
pub fn sknp(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let key = m.vx(op) & 0x0F;
    match m.keypad.is_pressed(key) {
        Ok(pressed) => Ok(Flow::Skip(!pressed)),
        Err(err) => keypad_failure(err),
    }
}

/// Vx = DT
pub fn ld_from_dt(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let delay = m.state.delay_timer;
    m.set_vx(op, delay);
    Ok(Flow::Next)
}

/// await keypress for Vx
/// Blocks the machine until the keypad answers
pub fn ld_key(op: Opcode, m: &mut Machine) -> Result<Flow> {
    match m.keypad.wait_key() {
        Ok(key) => {
            m.set_vx(op, key & 0x0F);
            Ok(Flow::Next)
        }
        Err(err) => keypad_failure(err),
    }
}

/// DT = Vx
pub fn ld_dt(op: Opcode, m: &mut Machine) -> Result<Flow> {
    m.state.delay_timer = m.vx(op);
    Ok(Flow::Next)
}

/// ST = Vx
pub fn ld_st(op: Opcode, m: &mut Machine) -> Result<Flow> {
    m.state.sound_timer = m.vx(op);
    Ok(Flow::Next)
}

/// I += Vx
pub fn add_i(op: Opcode, m: &mut Machine) -> Result<Flow> {
    m.state.i = m.state.i.wrapping_add(u16::from(m.vx(op)));
    Ok(Flow::Next)
}

/// I = address of the sprite for digit Vx
/// See constants::SPRITE_SHEET
pub fn ld_font(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let digit = u16::from(m.vx(op) & 0x0F);
    m.state.i = FONT_START + digit * FONT_GLYPH_SIZE;
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(op: Opcode, m: &mut Machine) -> Result<Flow> {
    let vx = m.vx(op);
    let i = m.state.i;
    m.memory.write(i, vx / 100);
    m.memory.write(i.wrapping_add(1), vx / 10 % 10);
    m.memory.write(i.wrapping_add(2), vx % 10);
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn store(op: Opcode, m: &mut Machine) -> Result<Flow> {
    for reg in 0..=op.x() {
        let value = m.state.v[reg as usize];
        m.memory.write(m.state.i.wrapping_add(u16::from(reg)), value);
    }
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn load(op: Opcode, m: &mut Machine) -> Result<Flow> {
    for reg in 0..=op.x() {
        m.state.v[reg as usize] = m.memory.read(m.state.i.wrapping_add(u16::from(reg)));
    }
    Ok(Flow::Next)
}

/// A quit request from the keypad ends the run; anything else is a fault.
fn keypad_failure(err: KeypadError) -> Result<Flow> {
    match err {
        KeypadError::Cancelled => Ok(Flow::Cancel),
        KeypadError::Device(reason) => Err(Chip8Error::Keypad(reason)),
    }
}
