//! Process exit codes surfaced to the management platform.
//!
//! Installer results pass through unchanged except plain success, which is 0,
//! and failures whose code would be misread (see [`exit_code_for`]).
//! Internal faults use reserved bands outside the installer's code range so
//! the failing phase can be read from the code alone:
//!
//! | Band          | Phase          |
//! |---------------|----------------|
//! | 70001..=70099 | pre-operation  |
//! | 70101..=70199 | operation      |
//! | 70201..=70299 | post-operation |

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::classify::{Classification, ExitOutcome};

pub const SUCCESS: i32 = 0;

pub const PRE_OPERATION_BAND: RangeInclusive<i32> = 70001..=70099;
pub const OPERATION_BAND: RangeInclusive<i32> = 70101..=70199;
pub const POST_OPERATION_BAND: RangeInclusive<i32> = 70201..=70299;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    PreOperation,
    Operation,
    PostOperation,
}

/// Internal faults that are not installer results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fault {
    /// Configuration could not be loaded or is invalid
    ConfigInvalid,
    /// No software catalog could be read
    InventoryUnreadable,
    /// A blocking process could not be terminated
    BlockingProcess,
    /// Confirmation was required but no terminal is attached
    PromptUnavailable,
    /// The installer could not be started
    LaunchFailed,
    /// The installer ended without an exit code
    ProcessTerminated,
    /// A failed result whose raw code would read as success or as a fault
    UnmappableResult,
    /// The result log could not be written
    LogUnwritable,
    /// The result could not be written to stdout
    OutputFailed,
    /// Errors were logged during a run that otherwise succeeded
    ErrorsReported,
}

impl Fault {
    pub const fn code(self) -> i32 {
        match self {
            Fault::ConfigInvalid => 70001,
            Fault::InventoryUnreadable => 70002,
            Fault::BlockingProcess => 70003,
            Fault::PromptUnavailable => 70004,
            Fault::LaunchFailed => 70101,
            Fault::ProcessTerminated => 70102,
            Fault::UnmappableResult => 70103,
            Fault::LogUnwritable => 70201,
            Fault::OutputFailed => 70202,
            Fault::ErrorsReported => 70203,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            Fault::ConfigInvalid
            | Fault::InventoryUnreadable
            | Fault::BlockingProcess
            | Fault::PromptUnavailable => Phase::PreOperation,
            Fault::LaunchFailed | Fault::ProcessTerminated | Fault::UnmappableResult => {
                Phase::Operation
            }
            Fault::LogUnwritable | Fault::OutputFailed | Fault::ErrorsReported => {
                Phase::PostOperation
            }
        }
    }
}

/// Phase of a reserved fault code; `None` for installer codes.
pub fn phase_of(code: i32) -> Option<Phase> {
    if PRE_OPERATION_BAND.contains(&code) {
        Some(Phase::PreOperation)
    } else if OPERATION_BAND.contains(&code) {
        Some(Phase::Operation)
    } else if POST_OPERATION_BAND.contains(&code) {
        Some(Phase::PostOperation)
    } else {
        None
    }
}

/// Exit code for a single classified outcome.
///
/// Plain success is 0; reboot variants keep their raw code so the platform
/// can schedule the restart; failures keep the installer's code unless that
/// code is 0 or inside a reserved band, where it would be misread.
pub fn exit_code_for(outcome: &ExitOutcome) -> i32 {
    match outcome.classification {
        Classification::Success => SUCCESS,
        Classification::SuccessRebootPending | Classification::SuccessRebootInitiated => {
            outcome.raw_code
        }
        Classification::Retryable | Classification::Failure => {
            if outcome.raw_code == SUCCESS || phase_of(outcome.raw_code).is_some() {
                Fault::UnmappableResult.code()
            } else {
                outcome.raw_code
            }
        }
    }
}

/// Final process code once the result logger's counters are known.
///
/// Only a successful code is replaced, so an installer failure stays
/// visible. A lost result log outranks logged errors.
pub fn settle(code: i32, write_failures: usize, errors_reported: usize) -> i32 {
    if code != SUCCESS {
        return code;
    }
    if write_failures > 0 {
        Fault::LogUnwritable.code()
    } else if errors_reported > 0 {
        Fault::ErrorsReported.code()
    } else {
        SUCCESS
    }
}
