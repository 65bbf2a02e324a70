//! Pending-address table configuration.
//!
//! The transceiver answers data requests from addresses listed in its source-match
//! table with the "frame pending" bit set. The table holds 8 extended (8-byte) and
//! 8 short (4-byte: PAN id + short address) slots in one shared address memory:
//!
//! ```text
//! offset  0 .. 64   extended slots 0-7, 8 bytes each
//! offset 64 .. 96   short slots 0-7, 4 bytes each
//! ```
//!
//! Each slot is switched on by one bit in an enable register and one bit in an
//! auto-pend register. The register layout is reached through [`FilterRegisters`],
//! implemented by the board support code.
//!
//! ## Ordering
//!
//! Updating a slot always clears its enable bits first, then writes the address,
//! then sets the enable bits, so the radio never matches against a half-written address.

use crate::consts::{
    EXT_ADDR_LEN, PENDING_EXT_FLAG, PENDING_SLOTS, SHORT_ADDR_LEN, SHORT_TABLE_OFFSET,
};
use crate::error::PendingError;

/// `FRMFILT0`: frame filtering enabled.
pub const FRMFILT0_FRM_FILTER_EN: u8 = 0x01;
/// `FRMFILT1`: accept beacon, data, ack and MAC command frames.
pub const FRMFILT1_ACCEPT_ALL: u8 = 0x78;
/// `SRCMATCH`: source address matching enabled.
pub const SRCMATCH_SRC_MATCH_EN: u8 = 0x01;
/// `SRCMATCH`: set the pending bit automatically on a match.
pub const SRCMATCH_AUTOPEND: u8 = 0x02;

/// Frame filtering and source-match registers touched by the bridge.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum FilterRegister {
    FrmFilt0,
    FrmFilt1,
    SrcMatch,
    SrcShortEn0,
    SrcShortEn1,
    SrcShortEn2,
    SrcShortPendEn0,
    SrcShortPendEn1,
    SrcShortPendEn2,
    SrcExtEn0,
    SrcExtEn1,
    SrcExtEn2,
    SrcExtPendEn0,
    SrcExtPendEn1,
    SrcExtPendEn2,
}

impl FilterRegister {
    /// Every per-slot enable and auto-pend register.
    pub const SLOT_ENABLES: [FilterRegister; 12] = [
        FilterRegister::SrcShortEn0,
        FilterRegister::SrcShortEn1,
        FilterRegister::SrcShortEn2,
        FilterRegister::SrcShortPendEn0,
        FilterRegister::SrcShortPendEn1,
        FilterRegister::SrcShortPendEn2,
        FilterRegister::SrcExtEn0,
        FilterRegister::SrcExtEn1,
        FilterRegister::SrcExtEn2,
        FilterRegister::SrcExtPendEn0,
        FilterRegister::SrcExtPendEn1,
        FilterRegister::SrcExtPendEn2,
    ];
}

/// Register-level access to the transceiver's frame filter.
pub trait FilterRegisters {
    /// Reads a register.
    fn read(&mut self, reg: FilterRegister) -> u8;

    /// Writes a register.
    fn write(&mut self, reg: FilterRegister, value: u8);

    /// Writes `bytes` into the shared source address table at `offset`.
    fn write_address(&mut self, offset: usize, bytes: &[u8]);

    /// Read-modify-write of a register.
    fn modify<F: FnOnce(u8) -> u8>(&mut self, reg: FilterRegister, f: F) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

impl<T: FilterRegisters + ?Sized> FilterRegisters for &mut T {
    fn read(&mut self, reg: FilterRegister) -> u8 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: FilterRegister, value: u8) {
        (**self).write(reg, value)
    }

    fn write_address(&mut self, offset: usize, bytes: &[u8]) {
        (**self).write_address(offset, bytes)
    }
}

/// Geometry of one of the two pending tables.
struct PendingTable {
    enable: FilterRegister,
    auto_pend: FilterRegister,
    base: usize,
    addr_len: usize,
}

const EXT_TABLE: PendingTable = PendingTable {
    enable: FilterRegister::SrcExtEn0,
    auto_pend: FilterRegister::SrcExtPendEn0,
    base: 0,
    addr_len: EXT_ADDR_LEN,
};

const SHORT_TABLE: PendingTable = PendingTable {
    enable: FilterRegister::SrcShortEn2,
    auto_pend: FilterRegister::SrcShortPendEn2,
    base: SHORT_TABLE_OFFSET,
    addr_len: SHORT_ADDR_LEN,
};

impl PendingTable {
    fn select(extended: bool) -> &'static PendingTable {
        if extended { &EXT_TABLE } else { &SHORT_TABLE }
    }

    fn set<R: FilterRegisters + ?Sized>(
        &self,
        regs: &mut R,
        index: u8,
        addr: &[u8],
    ) -> Result<(), PendingError> {
        if index >= PENDING_SLOTS {
            return Err(PendingError::SlotOutOfRange(index));
        }
        if !addr.is_empty() && addr.len() != self.addr_len {
            return Err(PendingError::BadAddressLength(addr.len()));
        }
        let set = 1u8 << index;
        let clear = !set;

        regs.modify(self.enable, |v| v & clear);
        regs.modify(self.auto_pend, |v| v & clear);
        if addr.is_empty() {
            return Ok(());
        }

        regs.write_address(self.base + usize::from(index) * self.addr_len, addr);
        regs.modify(self.auto_pend, |v| v | set);
        regs.modify(self.enable, |v| v | set);
        Ok(())
    }

    fn is_enabled<R: FilterRegisters + ?Sized>(&self, regs: &mut R, index: u8) -> bool {
        if index >= PENDING_SLOTS {
            return false;
        }
        let bit = 1u8 << index;
        regs.read(self.enable) & bit != 0 && regs.read(self.auto_pend) & bit != 0
    }
}

/// Verifies the filter configuration source matching depends on.
///
/// # Errors
/// The first failing check, in order: frame filtering, accepted frame types,
/// source matching, auto-pend.
pub fn check_filtering<R: FilterRegisters + ?Sized>(regs: &mut R) -> Result<(), PendingError> {
    if regs.read(FilterRegister::FrmFilt0) & FRMFILT0_FRM_FILTER_EN != FRMFILT0_FRM_FILTER_EN {
        return Err(PendingError::FrameFilterDisabled);
    }
    if regs.read(FilterRegister::FrmFilt1) & FRMFILT1_ACCEPT_ALL != FRMFILT1_ACCEPT_ALL {
        return Err(PendingError::FrameTypesRejected);
    }
    let src_match = regs.read(FilterRegister::SrcMatch);
    if src_match & SRCMATCH_SRC_MATCH_EN != SRCMATCH_SRC_MATCH_EN {
        return Err(PendingError::SourceMatchDisabled);
    }
    if src_match & SRCMATCH_AUTOPEND != SRCMATCH_AUTOPEND {
        return Err(PendingError::AutoPendDisabled);
    }
    Ok(())
}

/// Enables source matching with auto-pend, checks the filter, and disables every slot.
///
/// Slots are left untouched if the check fails.
pub fn init_pending_table<R: FilterRegisters + ?Sized>(regs: &mut R) -> Result<(), PendingError> {
    regs.modify(FilterRegister::SrcMatch, |v| {
        v | SRCMATCH_SRC_MATCH_EN | SRCMATCH_AUTOPEND
    });
    check_filtering(regs)?;
    for reg in FilterRegister::SLOT_ENABLES {
        regs.write(reg, 0);
    }
    Ok(())
}

/// Sets or clears one pending slot from a `SetPending` request.
///
/// The top bit of `index` selects the extended table, the low 7 bits the slot.
/// An empty `addr` disables the slot; otherwise `addr` must be exactly 8 bytes
/// (extended) or 4 bytes (short). Nothing is written when validation fails.
pub fn set_pending<R: FilterRegisters + ?Sized>(
    regs: &mut R,
    index: u8,
    addr: &[u8],
) -> Result<(), PendingError> {
    let extended = index & PENDING_EXT_FLAG != 0;
    PendingTable::select(extended).set(regs, index & !PENDING_EXT_FLAG, addr)
}

/// Returns `true` if both the enable and auto-pend bits of a slot are set.
pub fn is_pending_enabled<R: FilterRegisters + ?Sized>(
    regs: &mut R,
    extended: bool,
    index: u8,
) -> bool {
    PendingTable::select(extended).is_enabled(regs, index)
}
