//! Start-time construction for a slot label in a given room.
//!
//! Rooms showing the same slot are staggered: the n-th room in the room order
//! starts `n * offset` minutes after the label, where the offset comes from the
//! format policy (20 minutes for 4DX and IMAX, 15 otherwise).

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::dst::{self, DstPolicy};
use crate::error::{Result, ScheduleError};
use crate::format::{parse_slot_label, Format};
use crate::RoomId;

/// Builds staggered start instants in one civil timezone.
#[derive(Debug, Clone, Copy)]
pub struct SlotBuilder {
    pub tz: Tz,
    pub dst_policy: DstPolicy,
}

impl SlotBuilder {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            dst_policy: DstPolicy::default(),
        }
    }

    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.dst_policy = policy;
        self
    }

    /// Start instant of `slot_label` on `date` for `room_id`.
    ///
    /// # Errors
    /// - `InvalidSlotLabel` if the label is not `HH:MM`.
    /// - `RoomNotInOrder` if `room_id` is missing from `room_order`.
    /// - `NonexistentLocalTime` if the label falls in a DST gap under
    ///   [`DstPolicy::Skip`].
    pub fn build_start_time(
        &self,
        date: NaiveDate,
        slot_label: &str,
        format: &Format,
        room_order: &[RoomId],
        room_id: RoomId,
    ) -> Result<DateTime<Utc>> {
        let time = parse_slot_label(slot_label)
            .ok_or_else(|| ScheduleError::InvalidSlotLabel(slot_label.to_string()))?;
        let index = room_order
            .iter()
            .position(|&id| id == room_id)
            .ok_or(ScheduleError::RoomNotInOrder { room_id })?;

        let local = date.and_time(time);
        let base = dst::resolve_local(self.tz, local, self.dst_policy)
            .ok_or(ScheduleError::NonexistentLocalTime(local))?;

        Ok(base + Duration::minutes(index as i64 * format.inter_room_offset_minutes()))
    }
}

/// [`SlotBuilder::build_start_time`] with the default DST policy.
pub fn build_start_time(
    date: NaiveDate,
    slot_label: &str,
    tz: Tz,
    format: &Format,
    room_order: &[RoomId],
    room_id: RoomId,
) -> Result<DateTime<Utc>> {
    SlotBuilder::new(tz).build_start_time(date, slot_label, format, room_order, room_id)
}
