//! crates/slidecraft_core/src/ordering.rs
//!
//! The slide ordering rules, expressed over in-memory slide lists.
//!
//! Stores apply these inside one transaction. The SQL adapter issues the same
//! steps as statements; the in-memory adapter calls these functions directly.

use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{Slide, SlideOrder};
use crate::ports::{PortError, PortResult};

/// The order a slide appended to the end of `slides` receives.
pub fn next_order(slides: &[Slide]) -> i32 {
    slides.iter().map(|s| s.order).max().unwrap_or(0) + 1
}

/// Validates a requested insert position and clamps it to one past the end.
pub fn clamp_position(slides: &[Slide], position: i32) -> PortResult<i32> {
    if position < 1 {
        return Err(PortError::Invalid(format!(
            "Slide position must be at least 1, got {}",
            position
        )));
    }
    Ok(position.min(next_order(slides)))
}

/// Moves every slide at or after `position` up by one, highest order first.
///
/// Returns the ids in the order they were shifted. Walking downwards means no
/// intermediate state ever holds two slides at the same order.
pub fn shift_for_insert(slides: &mut [Slide], position: i32) -> Vec<Uuid> {
    let mut affected: Vec<&mut Slide> = slides.iter_mut().filter(|s| s.order >= position).collect();
    affected.sort_by(|a, b| b.order.cmp(&a.order));

    affected
        .into_iter()
        .map(|slide| {
            slide.order += 1;
            slide.id
        })
        .collect()
}

/// Shifts the followers of `slide.order` and places `slide` among them.
/// The list stays sorted by order.
pub fn insert_at(slides: &mut Vec<Slide>, slide: Slide) {
    shift_for_insert(slides, slide.order);
    slides.push(slide);
    sort_by_order(slides);
}

/// Applies a caller-supplied ordering.
///
/// Every id must belong to `slides`; otherwise nothing is changed. Whether the
/// result is contiguous is the caller's concern.
pub fn apply_reorder(slides: &mut [Slide], orders: &[SlideOrder]) -> PortResult<()> {
    let index: HashMap<Uuid, usize> = slides.iter().enumerate().map(|(i, s)| (s.id, i)).collect();

    let mut resolved = Vec::with_capacity(orders.len());
    for entry in orders {
        let position = index.get(&entry.slide_id).ok_or_else(|| {
            PortError::NotFound(format!("Slide {} not found in presentation", entry.slide_id))
        })?;
        resolved.push((*position, entry.order));
    }

    for (position, order) in resolved {
        slides[position].order = order;
    }
    Ok(())
}

pub fn sort_by_order(slides: &mut [Slide]) {
    slides.sort_by_key(|s| s.order);
}

/// True when the orders are exactly `1..=N` once sorted.
pub fn is_contiguous(slides: &[Slide]) -> bool {
    let mut orders: Vec<i32> = slides.iter().map(|s| s.order).collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(i, order)| *order == i as i32 + 1)
}
