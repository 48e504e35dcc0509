use tracing::debug;

use crate::error::PlanError;
use crate::types::{PlanConfig, Segment};

use super::source::LengthSource;

/// Pure function to partition `duration` seconds into contiguous segments.
///
/// Media no longer than `max_segment` comes back as a single segment. Longer
/// media is cut into lengths drawn from `lengths`, and a trailing remainder
/// shorter than `min_last_segment` is folded into the segment before it.
pub fn plan_segments<S: LengthSource + ?Sized>(
    duration: f64,
    config: &PlanConfig,
    lengths: &mut S,
) -> Result<Vec<Segment>, PlanError> {
    validate_duration(duration)?;
    config.validate()?;

    if duration <= f64::from(config.max_segment) {
        debug!(duration, "media fits in a single segment");
        return Ok(vec![Segment::new(0.0, duration)]);
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut current_time = 0.0;

    loop {
        let segment_length = f64::from(
            lengths
                .next_length(config.min_segment, config.max_segment)
                .clamp(config.min_segment, config.max_segment),
        );

        if current_time + segment_length >= duration {
            let last_len = duration - current_time;
            match segments.last_mut() {
                Some(previous) if last_len < config.min_last_segment => {
                    debug!(last_len, "merging short remainder into previous segment");
                    previous.duration += last_len;
                }
                _ => segments.push(Segment::new(current_time, last_len)),
            }
            break;
        }

        segments.push(Segment::new(current_time, segment_length));
        current_time += segment_length;
    }

    debug!(duration, count = segments.len(), "planned segments");
    Ok(segments)
}

fn validate_duration(duration: f64) -> Result<(), PlanError> {
    if duration.is_nan() {
        return Err(PlanError::InvalidArgument(
            "duration must be a number, got NaN".to_string(),
        ));
    }
    if duration.is_infinite() {
        return Err(PlanError::InvalidArgument(format!(
            "duration must be finite, got {}",
            duration
        )));
    }
    if duration < 0.0 {
        return Err(PlanError::InvalidArgument(format!(
            "duration must be non-negative, got {}",
            duration
        )));
    }
    Ok(())
}
