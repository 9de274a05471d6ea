//! Single-flight capture gate.
//!
//! At most one capture is in flight; a new one needs a fresh transition into
//! the ready state, the cooldown since the last finished capture, and the
//! re-arm delay since two hands appeared.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::DebounceParams;
use crate::pipeline::CaptureError;

/// Opaque id of one capture, handed out when the capture starts and
/// required to finish it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureTicket(u64);

impl CaptureTicket {
    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CaptureTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gate {
    Idle,
    InFlight { ticket: CaptureTicket, started_ms: f64 },
}

/// Why a ready transition did not start a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suppressed {
    Busy,
    CoolingDown,
    NotRearmed,
}

/// Capture debouncer owning the single-flight token.
#[derive(Clone, Debug)]
pub struct CaptureDebouncer {
    params: DebounceParams,
    gate: Gate,
    last_finished_ms: Option<f64>,
    next_ticket: u64,
    was_ready: bool,
    pair_since_ms: Option<f64>,
}

impl CaptureDebouncer {
    pub fn new(params: DebounceParams) -> Self {
        Self {
            params,
            gate: Gate::Idle,
            last_finished_ms: None,
            next_ticket: 1,
            was_ready: false,
            pair_since_ms: None,
        }
    }

    /// Ticket of the capture in flight, if any.
    pub fn in_flight(&self) -> Option<CaptureTicket> {
        match self.gate {
            Gate::Idle => None,
            Gate::InFlight { ticket, .. } => Some(ticket),
        }
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.in_flight().is_some()
    }

    /// Track continuous two-hand presence for the re-arm delay.
    pub fn observe_pair(&mut self, present: bool, now_ms: f64) {
        if present {
            self.pair_since_ms.get_or_insert(now_ms);
        } else {
            self.pair_since_ms = None;
        }
    }

    fn check(&self, now_ms: f64) -> Result<(), Suppressed> {
        if self.is_busy() {
            return Err(Suppressed::Busy);
        }
        if let Some(last) = self.last_finished_ms {
            if now_ms - last < self.params.min_interval_ms {
                return Err(Suppressed::CoolingDown);
            }
        }
        match self.pair_since_ms {
            Some(since) if now_ms - since >= self.params.rearm_delay_ms => Ok(()),
            _ => Err(Suppressed::NotRearmed),
        }
    }

    /// Offer this tick's ready flag. Starts a capture only on a rising edge
    /// that passes every gate condition.
    pub fn offer(
        &mut self,
        ready: bool,
        now_ms: f64,
    ) -> Result<Option<CaptureTicket>, Suppressed> {
        let rising = ready && !self.was_ready;
        self.was_ready = ready;
        if !rising {
            return Ok(None);
        }
        self.check(now_ms)?;
        let ticket = CaptureTicket(self.next_ticket);
        self.next_ticket += 1;
        self.gate = Gate::InFlight {
            ticket,
            started_ms: now_ms,
        };
        Ok(Some(ticket))
    }

    /// Close the gate for `ticket`; returns how long the capture took.
    pub fn finish(&mut self, ticket: CaptureTicket, now_ms: f64) -> Result<f64, CaptureError> {
        match self.gate {
            Gate::InFlight {
                ticket: current,
                started_ms,
            } if current == ticket => {
                self.gate = Gate::Idle;
                self.last_finished_ms = Some(now_ms);
                Ok((now_ms - started_ms).max(0.0))
            }
            Gate::InFlight {
                ticket: current, ..
            } => Err(CaptureError::StaleTicket {
                ticket,
                in_flight: current,
            }),
            Gate::Idle => Err(CaptureError::NotInFlight { ticket }),
        }
    }

    /// Force-release a capture that has been in flight longer than the
    /// configured timeout. Counts as finished for the cooldown.
    ///
    /// Returns the released ticket and how long it was in flight.
    pub fn expire(&mut self, now_ms: f64) -> Option<(CaptureTicket, f64)> {
        let timeout = self.params.capture_timeout_ms?;
        match self.gate {
            Gate::InFlight { ticket, started_ms } if now_ms - started_ms >= timeout => {
                self.gate = Gate::Idle;
                self.last_finished_ms = Some(now_ms);
                Some((ticket, now_ms - started_ms))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        let next_ticket = self.next_ticket;
        *self = Self::new(self.params.clone());
        self.next_ticket = next_ticket;
    }
}
