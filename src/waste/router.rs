//! Disposal container selection.

use crate::store::WasteContainer;

/// Picks the waste container for an item of the given category and
/// footprint, or `None` when nothing accepts it — at which point an
/// administrator has to create a new waste container; the engine does not
/// retry.
///
/// A container is eligible when its category set contains the item's
/// category or the `"general"` sentinel, and both capacity limits hold.
/// Eligible containers are ranked by the same space-efficiency formula the
/// placement scorer uses; ties resolve toward the higher container id.
///
/// Pure function over the supplied snapshot.
pub fn select_waste_container<'a>(
    category: &str,
    volume: f64,
    weight: f64,
    containers: impl IntoIterator<Item = &'a WasteContainer>,
) -> Option<String> {
    let mut best: Option<(f64, String)> = None;
    for container in containers {
        if !container.accepts(category) {
            continue;
        }
        if !container.capacity.can_hold(volume, weight) {
            continue;
        }

        let remaining = container.capacity.free_volume();
        let space_efficiency = 1.0 - (remaining - volume) / container.capacity.total_volume;

        // Non-strict improvement: on an exact tie the later (higher) id wins
        match &best {
            Some((current, _)) if space_efficiency < *current => {}
            _ => best = Some((space_efficiency, container.id.clone())),
        }
    }
    best.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Capacity;

    fn container(id: &str, categories: &[&str], total: f64, used: f64) -> WasteContainer {
        let mut capacity = Capacity::new(total, 100.0);
        capacity.charge(id, used, 0.0).unwrap();
        WasteContainer {
            id: id.into(),
            name: id.to_uppercase(),
            capacity,
            accepted_categories: categories.iter().map(|s| s.to_string()).collect(),
            undock_date: None,
        }
    }

    #[test]
    fn test_category_mismatch_returns_none() {
        let organic = container("w1", &["organic"], 30.0, 0.0);
        let selected = select_waste_container("electronic", 1.0, 1.0, [&organic]);
        assert!(selected.is_none());
    }

    #[test]
    fn test_general_sentinel_accepts_anything() {
        let general = container("w1", &["general"], 30.0, 0.0);
        let selected = select_waste_container("electronic", 1.0, 1.0, [&general]);
        assert_eq!(selected.as_deref(), Some("w1"));
    }

    #[test]
    fn test_full_container_skipped() {
        let full = container("w1", &["general"], 10.0, 9.5);
        let open = container("w2", &["general"], 10.0, 0.0);
        let selected = select_waste_container("organic", 1.0, 1.0, [&full, &open]);
        assert_eq!(selected.as_deref(), Some("w2"));
    }

    #[test]
    fn test_tighter_fit_wins() {
        // w1 nearly full: eff = 1 - (2 - 1)/10 = 0.9
        // w2 empty:       eff = 1 - (10 - 1)/10 = 0.1
        let snug = container("w1", &["general"], 10.0, 8.0);
        let roomy = container("w2", &["general"], 10.0, 0.0);
        let selected = select_waste_container("organic", 1.0, 1.0, [&roomy, &snug]);
        assert_eq!(selected.as_deref(), Some("w1"));
    }

    #[test]
    fn test_tie_goes_to_higher_id() {
        let a = container("w1", &["general"], 10.0, 0.0);
        let b = container("w2", &["general"], 10.0, 0.0);
        let selected = select_waste_container("organic", 1.0, 1.0, [&a, &b]);
        assert_eq!(selected.as_deref(), Some("w2"));
    }

    #[test]
    fn test_no_containers_returns_none() {
        assert!(select_waste_container("organic", 1.0, 1.0, []).is_none());
    }
}
