use chrono::NaiveTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Row not found: {0}")]
    MissingRow(String),

    #[error("Slot {first_start}-{first_end} overlaps slot {second_start}-{second_end}")]
    SlotOverlap {
        first_start: NaiveTime,
        first_end: NaiveTime,
        second_start: NaiveTime,
        second_end: NaiveTime,
    },
}
