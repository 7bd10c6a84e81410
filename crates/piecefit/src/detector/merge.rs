use crate::geometry::Rect;

/// Fixed-point absorption: each pass lets every surviving rectangle greedily
/// absorb later ones (testing against its growing union), until a pass
/// changes nothing.
fn merge_until_stable(rects: &[Rect], should_merge: impl Fn(&Rect, &Rect) -> bool) -> Vec<Rect> {
    let mut current: Vec<Rect> = rects.to_vec();
    loop {
        let mut absorbed = vec![false; current.len()];
        let mut next = Vec::with_capacity(current.len());
        let mut changed = false;

        for i in 0..current.len() {
            if absorbed[i] {
                continue;
            }
            let mut acc = current[i];
            for j in (i + 1)..current.len() {
                if absorbed[j] {
                    continue;
                }
                if should_merge(&acc, &current[j]) {
                    acc = acc.union(&current[j]);
                    absorbed[j] = true;
                    changed = true;
                }
            }
            next.push(acc);
        }

        current = next;
        if !changed || current.len() < 2 {
            return current;
        }
    }
}

/// Merge rectangles whose intersection exceeds `overlap_threshold` times the
/// smaller area. A threshold of 0 merges on any shared pixel; touching
/// edges do not count.
pub fn merge_overlapping(rects: &[Rect], overlap_threshold: f64) -> Vec<Rect> {
    merge_until_stable(rects, |a, b| {
        let inter = a.intersection_area(b);
        if inter == 0 {
            return false;
        }
        let smaller = a.area().min(b.area());
        inter as f64 > overlap_threshold * smaller as f64
    })
}

/// Merge rectangles whose nearest edges are at most `max_distance` apart.
pub fn merge_close(rects: &[Rect], max_distance: f64) -> Vec<Rect> {
    merge_until_stable(rects, |a, b| a.edge_distance(b) <= max_distance)
}
