//! Per-role seat allocations.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::role::Role;

/// Used and licensed seats for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SeatAllocation {
    pub used: u32,
    pub total: u32,
}

impl SeatAllocation {
    pub fn new(used: u32, total: u32) -> Self {
        Self { used, total }
    }

    /// Seats left to hand out. Zero when the allocation is malformed.
    pub fn available(&self) -> u32 {
        self.total.saturating_sub(self.used)
    }

    /// `used > total`; never produced by this crate but possible in imported data.
    pub fn is_overallocated(&self) -> bool {
        self.used > self.total
    }
}

/// Seat allocations of an account, one per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Seats {
    pub admin: SeatAllocation,
    pub supervisor: SeatAllocation,
    pub agent: SeatAllocation,
}

impl Seats {
    /// Fresh allocation with nothing used yet.
    pub fn with_totals(admin: u32, supervisor: u32, agent: u32) -> Self {
        Self {
            admin: SeatAllocation::new(0, admin),
            supervisor: SeatAllocation::new(0, supervisor),
            agent: SeatAllocation::new(0, agent),
        }
    }

    pub fn for_role(&self, role: Role) -> &SeatAllocation {
        match role {
            Role::Admin => &self.admin,
            Role::Supervisor => &self.supervisor,
            Role::Agent => &self.agent,
        }
    }

    pub fn for_role_mut(&mut self, role: Role) -> &mut SeatAllocation {
        match role {
            Role::Admin => &mut self.admin,
            Role::Supervisor => &mut self.supervisor,
            Role::Agent => &mut self.agent,
        }
    }

    /// `total - used` for a role.
    pub fn available(&self, role: Role) -> u32 {
        self.for_role(role).available()
    }

    pub fn total_used(&self) -> u32 {
        Role::ALL.iter().map(|role| self.for_role(*role).used).sum()
    }

    pub fn total_capacity(&self) -> u32 {
        Role::ALL.iter().map(|role| self.for_role(*role).total).sum()
    }

    /// Reports the first role whose used seats exceed its total.
    pub fn validate(&self) -> DomainResult<()> {
        for role in Role::ALL {
            let allocation = self.for_role(role);
            if allocation.is_overallocated() {
                return Err(DomainError::OverAllocated {
                    role,
                    used: allocation.used,
                    total: allocation.total,
                });
            }
        }
        Ok(())
    }

    /// Set a new licensed total, refusing to drop below the seats in use.
    pub fn resize(&mut self, role: Role, total: u32) -> DomainResult<()> {
        let allocation = self.for_role_mut(role);
        if total < allocation.used {
            return Err(DomainError::validation(format!(
                "{} seats cannot be reduced to {} while {} are in use",
                role, total, allocation.used
            )));
        }
        allocation.total = total;
        Ok(())
    }

    /// Take one seat of `role`.
    ///
    /// With `enforce` unset an exhausted role is still reserved and the
    /// caller gets `false` back so it can report the overrun.
    pub fn reserve(&mut self, role: Role, enforce: bool) -> DomainResult<bool> {
        let allocation = self.for_role_mut(role);
        let had_room = allocation.available() > 0;
        if !had_room && enforce {
            return Err(DomainError::SeatsExhausted(role));
        }
        allocation.used += 1;
        Ok(had_room)
    }

    /// Give back one seat of `role`.
    pub fn release(&mut self, role: Role) {
        let allocation = self.for_role_mut(role);
        allocation.used = allocation.used.saturating_sub(1);
    }
}
