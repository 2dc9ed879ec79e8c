use common::shapes::{Point, Ray, Rectangle};
use parking_lot::RwLock;
use quadtree::{Collider, ColliderId, ItemClass, QuadTree, QuadtreeError, QueryMode};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

struct TestCollider {
    id: ColliderId,
    bb: RwLock<Rectangle>,
}

impl TestCollider {
    fn new(id: u32, bb: Rectangle) -> Arc<Self> {
        Arc::new(Self {
            id: ColliderId(id),
            bb: RwLock::new(bb),
        })
    }

    fn move_to(&self, x: f32, y: f32) {
        let mut bb = self.bb.write();
        bb.x = x;
        bb.y = y;
    }
}

impl Collider for TestCollider {
    fn id(&self) -> ColliderId {
        self.id
    }

    fn bounding_box(&self) -> Rectangle {
        *self.bb.read()
    }
}

fn world() -> Rectangle {
    Rectangle::new(0.0, 0.0, 256.0, 256.0)
}

fn tree(load_factor: usize) -> QuadTree<TestCollider> {
    QuadTree::new(world(), load_factor, 64.0).unwrap()
}

fn ids(found: &[Arc<TestCollider>]) -> HashSet<u32> {
    found.iter().map(|c| c.id.0).collect()
}

// One small box per quadrant of the 256x256 world, ids 0..4.
fn quadrant_boxes() -> Vec<Arc<TestCollider>> {
    vec![
        TestCollider::new(0, Rectangle::new(60.0, 60.0, 4.0, 4.0)),
        TestCollider::new(1, Rectangle::new(-60.0, 60.0, 4.0, 4.0)),
        TestCollider::new(2, Rectangle::new(-60.0, -60.0, 4.0, 4.0)),
        TestCollider::new(3, Rectangle::new(60.0, -60.0, 4.0, 4.0)),
    ]
}

#[test]
fn test_rejects_small_min_division() {
    let result = QuadTree::<TestCollider>::new(world(), 4, 16.0);
    assert!(matches!(
        result,
        Err(QuadtreeError::MinDivisionTooSmall { .. })
    ));
    assert!(QuadTree::<TestCollider>::new(world(), 4, 32.0).is_ok());
}

#[test]
fn test_rejects_empty_area() {
    let result = QuadTree::<TestCollider>::new(Rectangle::new(0.0, 0.0, 0.0, 100.0), 4, 64.0);
    assert!(matches!(result, Err(QuadtreeError::InvalidArea { .. })));
    let result = QuadTree::<TestCollider>::new(Rectangle::new(0.0, 0.0, f32::NAN, 100.0), 4, 64.0);
    assert!(matches!(result, Err(QuadtreeError::InvalidArea { .. })));
}

#[test]
fn test_empty_tree() {
    let qt = tree(4);
    assert!(qt.is_empty());
    assert_eq!(qt.node_count(), 0);
    assert!(qt.query_point(Point::new(0.0, 0.0), QueryMode::All).is_empty());
    assert!(qt.query_rect(&world(), QueryMode::All).is_empty());
    qt.check_invariants().unwrap();
}

#[test]
fn test_split_trigger() {
    let qt = tree(3);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    let guard = qt.lock();
    let root = guard.node(guard.root().unwrap());
    assert!(root.children().is_some());
    assert!(root.items().is_empty());
    assert_eq!(guard.node_count(), 5);
    for child in root.children().unwrap() {
        assert_eq!(guard.node(child).items().len(), 1);
        assert_eq!(guard.node(child).depth(), 1);
    }
    guard.check_invariants().unwrap();
}

#[test]
fn test_split_floor() {
    let qt: QuadTree<TestCollider> =
        QuadTree::new(Rectangle::new(0.0, 0.0, 64.0, 64.0), 2, 64.0).unwrap();
    qt.insert(TestCollider::new(0, Rectangle::new(10.0, 10.0, 2.0, 2.0))).unwrap();
    qt.insert(TestCollider::new(1, Rectangle::new(-10.0, 10.0, 2.0, 2.0))).unwrap();
    qt.insert(TestCollider::new(2, Rectangle::new(-10.0, -10.0, 2.0, 2.0))).unwrap();
    qt.insert(TestCollider::new(3, Rectangle::new(10.0, -10.0, 2.0, 2.0))).unwrap();

    let guard = qt.lock();
    let root = guard.node(guard.root().unwrap());
    assert!(root.is_leaf());
    assert_eq!(root.items().len(), 4);
    assert_eq!(guard.node_count(), 1);
}

#[test]
fn test_merge_trigger() {
    let qt = tree(4);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    qt.insert(TestCollider::new(4, Rectangle::new(90.0, 90.0, 4.0, 4.0))).unwrap();
    assert_eq!(qt.node_count(), 5);

    qt.deactivate(ColliderId(4)).unwrap();
    assert_eq!(qt.node_count(), 5);
    qt.delete(ColliderId(0)).unwrap();
    qt.delete(ColliderId(1)).unwrap();
    assert_eq!(qt.node_count(), 5);
    qt.check_invariants().unwrap();

    qt.delete(ColliderId(2)).unwrap();
    assert_eq!(qt.node_count(), 1);
    qt.check_invariants().unwrap();

    let root = qt.lock().root().unwrap();
    assert_eq!(qt.owner_of(ColliderId(3)), Some(root));
    assert_eq!(qt.owner_of(ColliderId(4)), Some(root));
    assert_eq!(qt.class_of(ColliderId(3)), Some(ItemClass::Normal));
    assert_eq!(qt.class_of(ColliderId(4)), Some(ItemClass::Inactive));
}

#[test]
fn test_split_again_after_merge() {
    let qt = tree(4);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    qt.insert(TestCollider::new(4, Rectangle::new(90.0, 90.0, 4.0, 4.0))).unwrap();
    for id in 0..4 {
        qt.delete(ColliderId(id)).unwrap();
    }
    assert_eq!(qt.node_count(), 1);
    for (i, collider) in quadrant_boxes().into_iter().enumerate() {
        collider.move_to(-90.0 + i as f32, -90.0);
        qt.insert(collider).unwrap();
    }
    assert_eq!(qt.node_count(), 5);
    qt.check_invariants().unwrap();
}

#[test]
fn test_overlap_routing() {
    let qt = tree(3);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    qt.insert(TestCollider::new(10, Rectangle::new(0.0, 0.0, 10.0, 10.0))).unwrap();
    qt.insert(TestCollider::new(11, Rectangle::new(0.0, 60.0, 10.0, 4.0))).unwrap();

    let root = qt.lock().root().unwrap();
    assert_eq!(qt.owner_of(ColliderId(10)), Some(root));
    assert_eq!(qt.owner_of(ColliderId(11)), Some(root));
    assert_eq!(qt.class_of(ColliderId(10)), Some(ItemClass::Inline));
    assert_eq!(qt.class_of(ColliderId(11)), Some(ItemClass::Inline));
    qt.check_invariants().unwrap();
}

#[test]
fn test_overlap_inside_child() {
    let qt = tree(1);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    // Crosses the centre of the north-east child only.
    qt.insert(TestCollider::new(10, Rectangle::new(64.0, 64.0, 10.0, 10.0))).unwrap();
    let guard = qt.lock();
    let owner = guard.owner_of(ColliderId(10)).unwrap();
    let node = guard.node(owner);
    assert_eq!(node.depth(), 1);
    assert_eq!(node.area(), Rectangle::from_left_top(0.0, 0.0, 128.0, 128.0));
    assert_eq!(guard.class_of(ColliderId(10)), Some(ItemClass::Inline));
}

#[test]
fn test_round_trip() {
    let qt = tree(2);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    let owners_before: Vec<_> = (0..4).map(|id| qt.owner_of(ColliderId(id))).collect();
    let areas_before = qt.node_areas();

    qt.insert(TestCollider::new(9, Rectangle::new(100.0, -100.0, 2.0, 2.0))).unwrap();
    assert!(qt.contains(ColliderId(9)));
    qt.delete(ColliderId(9)).unwrap();

    assert!(!qt.contains(ColliderId(9)));
    assert_eq!(qt.len(), 4);
    assert_eq!(qt.node_areas(), areas_before);
    let owners_after: Vec<_> = (0..4).map(|id| qt.owner_of(ColliderId(id))).collect();
    assert_eq!(owners_after, owners_before);
    qt.check_invariants().unwrap();
}

#[test]
fn test_reference_grid_query() {
    let qt = tree(2);
    let steps = [-128.0, -58.0, 12.0, 82.0];
    let mut all = Vec::new();
    let mut id = 0;
    for &x in &steps {
        for &y in &steps {
            let collider = TestCollider::new(id, Rectangle::from_left_top(x, y, 2.0, 2.0));
            qt.insert(collider.clone()).unwrap();
            all.push(collider);
            id += 1;
        }
    }
    qt.check_invariants().unwrap();

    let mut samples = vec![
        Point::new(1.0, 1.0),
        Point::new(-1.0, 1.0),
        Point::new(-1.0, -1.0),
        Point::new(1.0, -1.0),
    ];
    samples.extend(all.iter().map(|c| c.bounding_box().center()));
    for point in samples {
        let hits: HashSet<u32> = qt
            .query_point(point, QueryMode::ActiveOnly)
            .iter()
            .filter(|c| c.bounding_box().contains_point(point.x, point.y))
            .map(|c| c.id.0)
            .collect();
        let expected: HashSet<u32> = all
            .iter()
            .filter(|c| c.bounding_box().contains_point(point.x, point.y))
            .map(|c| c.id.0)
            .collect();
        assert_eq!(hits, expected, "point {:?}", point);
    }

    let mut qt = qt;
    let mut count = 0;
    qt.traverse(|_, _, _, _| {
        count += 1;
        false
    });
    assert_eq!(count, 16);
}

#[test]
fn test_deactivate_activate_round_trip() {
    let qt = tree(2);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    let point = Point::new(60.0, 60.0);

    qt.deactivate(ColliderId(0)).unwrap();
    assert_eq!(qt.class_of(ColliderId(0)), Some(ItemClass::Inactive));
    assert!(!ids(&qt.query_point(point, QueryMode::ActiveOnly)).contains(&0));
    assert!(ids(&qt.query_point(point, QueryMode::InactiveOnly)).contains(&0));
    assert!(ids(&qt.query_point(point, QueryMode::All)).contains(&0));
    qt.check_invariants().unwrap();

    qt.activate(ColliderId(0)).unwrap();
    assert_eq!(qt.class_of(ColliderId(0)), Some(ItemClass::Normal));
    assert!(ids(&qt.query_point(point, QueryMode::ActiveOnly)).contains(&0));
    assert!(!ids(&qt.query_point(point, QueryMode::InactiveOnly)).contains(&0));
    qt.check_invariants().unwrap();
}

#[test]
fn test_activate_reroutes_moved_collider() {
    let qt = tree(2);
    let boxes = quadrant_boxes();
    for collider in &boxes {
        qt.insert(collider.clone()).unwrap();
    }
    qt.deactivate(ColliderId(0)).unwrap();
    boxes[0].move_to(-100.0, -100.0);
    qt.activate(ColliderId(0)).unwrap();

    let hits = ids(&qt.query_point(Point::new(-100.0, -100.0), QueryMode::ActiveOnly));
    assert!(hits.contains(&0));
    qt.check_invariants().unwrap();
}

#[test]
fn test_repeated_state_changes_are_noops() {
    let qt = tree(4);
    qt.insert(TestCollider::new(0, Rectangle::new(10.0, 10.0, 2.0, 2.0))).unwrap();
    qt.activate(ColliderId(0)).unwrap();
    assert_eq!(qt.class_of(ColliderId(0)), Some(ItemClass::Normal));
    qt.deactivate(ColliderId(0)).unwrap();
    qt.deactivate(ColliderId(0)).unwrap();
    assert_eq!(qt.class_of(ColliderId(0)), Some(ItemClass::Inactive));
    assert_eq!(qt.len(), 1);
    qt.check_invariants().unwrap();
}

#[test]
fn test_overflow_at_root() {
    let qt = tree(2);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    qt.insert(TestCollider::new(7, Rectangle::new(1000.0, 1000.0, 4.0, 4.0))).unwrap();
    qt.insert(TestCollider::new(8, Rectangle::new(127.0, 0.0, 10.0, 10.0))).unwrap();

    let root = qt.lock().root().unwrap();
    assert_eq!(qt.owner_of(ColliderId(7)), Some(root));
    assert_eq!(qt.owner_of(ColliderId(8)), Some(root));
    assert_eq!(qt.class_of(ColliderId(7)), Some(ItemClass::Inline));

    let far_corner = Rectangle::new(-120.0, -120.0, 1.0, 1.0);
    assert!(ids(&qt.query_rect(&far_corner, QueryMode::ActiveOnly)).contains(&7));
    assert!(ids(&qt.query_point(Point::new(-120.0, -120.0), QueryMode::ActiveOnly)).contains(&7));

    qt.delete(ColliderId(7)).unwrap();
    assert!(!qt.contains(ColliderId(7)));
    qt.check_invariants().unwrap();
}

#[test]
fn test_outer_corner_after_nested_split() {
    let area = Rectangle::from_left_top(-500.0, -500.0, 300.731, 300.731);
    let qt: QuadTree<TestCollider> = QuadTree::new(area, 1, 32.0).unwrap();
    // Root splits on the second insert; the third splits the north-east child.
    qt.insert(TestCollider::new(0, Rectangle::new(-300.0, -300.0, 2.0, 2.0))).unwrap();
    qt.insert(TestCollider::new(1, Rectangle::new(-420.0, -420.0, 2.0, 2.0))).unwrap();
    qt.insert(TestCollider::new(2, Rectangle::new(-300.0, -230.0, 2.0, 2.0))).unwrap();
    let root = qt.lock().root().unwrap();
    let leaf = qt.owner_of(ColliderId(0)).unwrap();
    assert_ne!(leaf, root);
    assert!(qt.lock().node(leaf).depth() >= 2);

    let (right, bottom) = (area.right(), area.bottom());
    let corner = Rectangle::from_min_max(right - 0.5, bottom - 0.5, right, bottom);
    qt.insert(TestCollider::new(3, corner)).unwrap();
    assert_eq!(qt.class_of(ColliderId(3)), Some(ItemClass::Normal));
    assert_ne!(qt.owner_of(ColliderId(3)), Some(root));
    assert!(ids(&qt.query_point(Point::new(right, bottom), QueryMode::All)).contains(&3));

    let (left, top) = (area.left(), area.top());
    let opposite = Rectangle::from_min_max(left, top, left + 0.5, top + 0.5);
    qt.insert(TestCollider::new(4, opposite)).unwrap();
    assert!(ids(&qt.query_point(Point::new(left, top), QueryMode::All)).contains(&4));
    qt.check_invariants().unwrap();
}

#[test]
fn test_caller_errors() {
    let qt = tree(2);
    let collider = TestCollider::new(0, Rectangle::new(10.0, 10.0, 2.0, 2.0));
    qt.insert(collider.clone()).unwrap();
    assert_eq!(
        qt.insert(collider),
        Err(QuadtreeError::AlreadyTracked(ColliderId(0)))
    );
    assert_eq!(
        qt.delete(ColliderId(5)).err(),
        Some(QuadtreeError::UnknownCollider(ColliderId(5)))
    );
    assert_eq!(
        qt.activate(ColliderId(5)),
        Err(QuadtreeError::UnknownCollider(ColliderId(5)))
    );
    assert_eq!(
        qt.deactivate(ColliderId(5)),
        Err(QuadtreeError::UnknownCollider(ColliderId(5)))
    );
    assert_eq!(qt.len(), 1);
}

#[test]
fn test_drifted_item_stays_inline_on_split() {
    let qt = tree(2);
    let boxes = quadrant_boxes();
    qt.insert(boxes[0].clone()).unwrap();
    qt.insert(boxes[1].clone()).unwrap();
    boxes[0].move_to(0.0, 60.0);
    qt.insert(boxes[2].clone()).unwrap();

    let root = qt.lock().root().unwrap();
    assert_eq!(qt.owner_of(ColliderId(0)), Some(root));
    assert_eq!(qt.class_of(ColliderId(0)), Some(ItemClass::Inline));
    qt.check_invariants().unwrap();
}

#[test]
fn test_ray_query() {
    let qt = tree(2);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    let ray = Ray::new(Point::new(-120.0, -60.0), Point::new(1.0, 0.0));
    let hits = ids(&qt.query_ray(&ray, QueryMode::ActiveOnly));
    assert!(hits.contains(&2));
    assert!(hits.contains(&3));
    assert!(!hits.contains(&0));
    assert!(!hits.contains(&1));
}

#[test]
fn test_traverse_order_and_early_stop() {
    let mut qt = tree(2);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    qt.insert(TestCollider::new(10, Rectangle::new(0.0, 0.0, 10.0, 10.0))).unwrap();
    qt.deactivate(ColliderId(10)).unwrap();

    let mut seen = Vec::new();
    let stopped = qt.traverse(|collider, node, class, _| {
        seen.push((collider.id.0, node.is_root(), class));
        false
    });
    assert!(!stopped);
    assert_eq!(seen.len(), 5);
    assert_eq!(seen.last(), Some(&(10, true, ItemClass::Inactive)));
    assert!(seen[..4].iter().all(|(_, is_root, _)| !is_root));

    let mut visited = 0;
    let stopped = qt.traverse(|_, _, _, _| {
        visited += 1;
        visited == 3
    });
    assert!(stopped);
    assert_eq!(visited, 3);
}

#[test]
fn test_traverse_with_lock_across_threads() {
    let qt = Arc::new(tree(2));
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    let reader = {
        let qt = qt.clone();
        std::thread::spawn(move || {
            let mut count = 0;
            qt.traverse_with_lock(|_, _, _, _| {
                count += 1;
                false
            });
            count
        })
    };
    assert_eq!(reader.join().unwrap(), 4);
}

#[test]
fn test_exclusive_phase_through_guard() {
    let qt = tree(2);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    let mut guard = qt.lock();
    let mut doomed = Vec::new();
    guard.traverse(|collider, _, _, _| {
        if collider.id.0 % 2 == 0 {
            doomed.push(collider.id);
        }
        false
    });
    for id in doomed {
        guard.delete(id).unwrap();
    }
    assert_eq!(guard.len(), 2);
    guard.check_invariants().unwrap();
}

#[test]
fn test_clear() {
    let qt = tree(2);
    for collider in quadrant_boxes() {
        qt.insert(collider).unwrap();
    }
    qt.clear();
    assert!(qt.is_empty());
    assert_eq!(qt.node_count(), 0);
    qt.insert(TestCollider::new(0, Rectangle::new(1.0, 1.0, 1.0, 1.0))).unwrap();
    assert_eq!(qt.node_count(), 1);
    qt.check_invariants().unwrap();
}

#[test]
fn test_random_workload() {
    let mut rng = StdRng::seed_from_u64(7);
    let area = Rectangle::new(0.0, 0.0, 1024.0, 1024.0);
    let qt: QuadTree<TestCollider> = QuadTree::new(area, 8, 32.0).unwrap();
    let mut live = Vec::new();
    for id in 0..500 {
        let center = area.random_point_inside(10.0, &mut rng);
        let collider = TestCollider::new(
            id,
            Rectangle::new(center.x, center.y, rng.gen_range(1.0..20.0), rng.gen_range(1.0..20.0)),
        );
        qt.insert(collider.clone()).unwrap();
        live.push(collider);
    }
    qt.check_invariants().unwrap();
    assert_eq!(qt.len(), 500);

    for _ in 0..250 {
        let index = rng.gen_range(0..live.len());
        let collider = live.swap_remove(index);
        qt.delete(collider.id).unwrap();
    }
    qt.check_invariants().unwrap();

    let mut inactive = HashSet::new();
    for collider in live.iter().step_by(5) {
        qt.deactivate(collider.id).unwrap();
        inactive.insert(collider.id.0);
    }
    qt.check_invariants().unwrap();

    for _ in 0..200 {
        let point = area.random_point_inside(0.0, &mut rng);
        let hits: HashSet<u32> = qt
            .query_point(point, QueryMode::ActiveOnly)
            .iter()
            .filter(|c| c.bounding_box().contains_point(point.x, point.y))
            .map(|c| c.id.0)
            .collect();
        let expected: HashSet<u32> = live
            .iter()
            .filter(|c| !inactive.contains(&c.id.0))
            .filter(|c| c.bounding_box().contains_point(point.x, point.y))
            .map(|c| c.id.0)
            .collect();
        assert_eq!(hits, expected);

        let window = Rectangle::new(point.x, point.y, 80.0, 80.0);
        let found = ids(&qt.query_rect(&window, QueryMode::All));
        for collider in &live {
            if collider.bounding_box().intersects(&window) {
                assert!(found.contains(&collider.id.0));
            }
        }
    }
}
