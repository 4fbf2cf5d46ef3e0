// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State transitions for the simulated secure-erase operation
//!
//! The transitions themselves are synchronous and infallible; the operation
//! controller in `registry` decides when to apply them and provides the
//! simulated delay in between.

use crate::resources::{Drive, DriveOperation, DriveState};

/// Redfish operation name reported while a secure erase is running.
pub const SANITIZE_OPERATION: &str = "Sanitize";

/// Percentage reported immediately after dispatch.
pub const START_PERCENTAGE: u8 = 10;

/// Percentage reported on completion.
pub const COMPLETE_PERCENTAGE: u8 = 100;

fn sanitize_operation(percentage_complete: u8) -> DriveOperation {
    DriveOperation {
        name: SANITIZE_OPERATION.to_string(),
        percentage_complete,
    }
}

/// Apply the start transition: the drive enters `INPROGRESS` with a single
/// `Sanitize` operation at [`START_PERCENTAGE`].
pub fn start(drive: &mut Drive) {
    drive.status.state = DriveState::InProgress;
    drive.operations = vec![sanitize_operation(START_PERCENTAGE)];
}

/// Apply the completion transition and return the state the drive landed in.
///
/// A drive that is not `INPROGRESS` when its operation finishes has been
/// mutated out from under the worker; it is marked `FAILED` rather than
/// reporting a completion that never happened.
pub fn finish(drive: &mut Drive) -> DriveState {
    if drive.status.state != DriveState::InProgress {
        drive.status.state = DriveState::Failed;
        drive.operations.clear();
        return DriveState::Failed;
    }
    drive.status.state = DriveState::Complete;
    drive.operations = vec![sanitize_operation(COMPLETE_PERCENTAGE)];
    DriveState::Complete
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resources::DriveKey;
    use std::collections::BTreeMap;

    fn test_drive() -> Drive {
        Drive::new(&DriveKey::new("S1", "ST1", "D1"), None, BTreeMap::new())
    }

    #[test]
    fn test_start_then_finish() {
        let mut drive = test_drive();
        start(&mut drive);
        assert_eq!(drive.status.state, DriveState::InProgress);
        assert_eq!(drive.operations.len(), 1);
        assert_eq!(drive.operations[0].name, SANITIZE_OPERATION);
        assert_eq!(drive.operations[0].percentage_complete, START_PERCENTAGE);

        assert_eq!(finish(&mut drive), DriveState::Complete);
        assert_eq!(drive.status.state, DriveState::Complete);
        assert_eq!(drive.operations.len(), 1);
        assert_eq!(
            drive.operations[0].percentage_complete,
            COMPLETE_PERCENTAGE
        );
    }

    #[test]
    fn test_restart_after_completion() {
        let mut drive = test_drive();
        start(&mut drive);
        finish(&mut drive);
        start(&mut drive);
        assert_eq!(drive.status.state, DriveState::InProgress);
        assert_eq!(drive.operations[0].percentage_complete, START_PERCENTAGE);
    }

    #[test]
    fn test_finish_without_start_fails() {
        let mut drive = test_drive();
        assert_eq!(finish(&mut drive), DriveState::Failed);
        assert_eq!(drive.status.state, DriveState::Failed);
        assert!(drive.operations.is_empty());
    }
}
