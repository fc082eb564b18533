use crate::*;

use alloc::vec::Vec;
use rowport::{
    Align, AnimationId, AnimationKind, DomAdapter, Element, ElementMarkers, ElementSpec, Extent,
    InsertPosition, RenderState, Trigger, ViewRange, Viewport, ViewportOptions,
};

/// Materialized keys in document order; every element is 20 high.
#[derive(Debug, Default)]
struct TestDom {
    nodes: Vec<u32>,
    async_animations: bool,
}

impl DomAdapter<u32, u32> for TestDom {
    type Markup = ();

    fn build_markup(&self, _element: &Element<u32, u32>) -> Self::Markup {}

    fn insert_at(&mut self, position: InsertPosition<u32>, batch: Vec<(u32, ())>) {
        let mut at = match position {
            InsertPosition::Start => 0,
            InsertPosition::After(key) => {
                self.nodes
                    .iter()
                    .position(|k| *k == key)
                    .expect("insert anchor is materialized")
                    + 1
            }
        };
        for (key, ()) in batch {
            self.nodes.insert(at, key);
            at += 1;
        }
    }

    fn remove_at(&mut self, key: &u32) {
        self.nodes.retain(|k| k != key);
    }

    fn is_materialized(&self, key: &u32) -> bool {
        self.nodes.contains(key)
    }

    fn measure(&mut self, _key: &u32) -> Option<Extent> {
        Some(Extent {
            height: 20,
            width: 100,
        })
    }

    fn update_fillers(&mut self, _before: u64, _after: u64) {}

    fn apply_markers(&mut self, _key: &u32, _markers: &ElementMarkers) {}

    fn start_animation(&mut self, _id: AnimationId, _kind: AnimationKind, _keys: &[u32]) -> bool {
        self.async_animations
    }
}

type TestViewport = Viewport<u32, u32, TestDom>;

fn table(count: u32, viewport_height: u32, dom: TestDom) -> TestViewport {
    let options = ViewportOptions::table().with_average_element_height(20);
    let mut vp = Viewport::new(options, dom);
    vp.insert_elements(
        (0..count).map(|k| ElementSpec::new(k, k)).collect(),
        Trigger::Program,
    )
    .unwrap();
    vp.set_viewport_height(viewport_height).unwrap();
    vp
}

fn prepend(keys: core::ops::Range<u32>) -> Vec<ElementSpec<u32, u32>> {
    keys.enumerate()
        .map(|(i, k)| ElementSpec::new(k, k).with_child_index(i))
        .collect()
}

#[test]
fn anchor_can_preserve_scroll_across_prepend() {
    let mut vp = table(100, 200, TestDom::default());
    vp.set_scroll_top(1_010).unwrap();

    let anchor = capture_first_visible_anchor(&vp).unwrap();
    assert_eq!(anchor.key, 50);
    assert_eq!(anchor.element_top, -10);

    // Prepend 10 rows: old rows shift down by 200.
    vp.insert_elements(prepend(1_000..1_010), Trigger::Program)
        .unwrap();
    assert!(apply_anchor(&mut vp, &anchor).unwrap());
    assert_eq!(vp.scroll_top(), 1_210);
    assert_eq!(vp.element_at_offset(vp.scroll_top()), Some(&50));
}

#[test]
fn anchor_below_the_scroll_top() {
    let vp = table(100, 200, TestDom::default());
    let anchor = capture_anchor_at_offset(&vp, 45).unwrap();
    assert_eq!(anchor.key, 2);
    assert_eq!(anchor.element_top, 40);

    let mut vp = table(100, 200, TestDom::default());
    vp.set_scroll_top(600).unwrap();
    vp.insert_elements(prepend(1_000..1_005), Trigger::Program)
        .unwrap();
    assert!(apply_anchor(&mut vp, &anchor).unwrap());
    // Row 2 now starts at 140 and should sit 40 below the scroll top.
    assert_eq!(vp.scroll_top(), 100);
}

#[test]
fn anchor_for_vanished_element_is_not_applied() {
    let mut vp = table(100, 200, TestDom::default());
    vp.set_scroll_top(1_000).unwrap();
    let anchor = capture_first_visible_anchor(&vp).unwrap();

    vp.delete_elements(&[50], Trigger::Program).unwrap();
    vp.set_scroll_top(300).unwrap();
    assert!(!apply_anchor(&mut vp, &anchor).unwrap());
    assert_eq!(vp.scroll_top(), 300);

    let empty = table(0, 200, TestDom::default());
    assert_eq!(capture_first_visible_anchor(&empty), None);
}

#[test]
fn controller_debounces_scroll_events() {
    let mut c = Controller::new(
        table(100, 200, TestDom::default()),
        ControllerOptions::default().with_scroll_debounce_ms(10),
    );

    c.on_scroll(500, 0);
    assert_eq!(c.tick(5).unwrap(), None);
    assert_eq!(c.viewport().scroll_top(), 0);

    c.on_scroll(1_000, 8);
    c.tick(15).unwrap();
    assert_eq!(c.viewport().scroll_top(), 0);
    assert!(c.has_pending_events());

    c.tick(18).unwrap();
    assert_eq!(c.viewport().scroll_top(), 1_000);
    assert_eq!(c.viewport().view_range_rendered(), ViewRange::new(45, 65));
    assert!(!c.has_pending_events());
}

#[test]
fn controller_debounces_resize_and_flushes() {
    let mut c = Controller::new(
        table(100, 200, TestDom::default()),
        ControllerOptions::default().with_resize_debounce_ms(100),
    );

    c.on_resize(400, 0);
    c.tick(50).unwrap();
    assert_eq!(c.viewport().viewport_height(), 200);
    c.tick(100).unwrap();
    assert_eq!(c.viewport().viewport_height(), 400);
    assert_eq!(c.viewport().view_range_size(), 40);

    c.on_resize(100, 200);
    c.on_scroll(400, 200);
    c.flush().unwrap();
    assert_eq!(c.viewport().viewport_height(), 100);
    assert_eq!(c.viewport().scroll_top(), 400);
    assert!(!c.has_pending_events());
}

#[test]
fn controller_tween_drives_scroll_top() {
    let mut c = Controller::new(
        table(1_000, 200, TestDom::default()),
        ControllerOptions::default(),
    );

    let to = c
        .start_tween_to(&500, Align::Start, 0, 100, Easing::SmoothStep)
        .unwrap();
    assert_eq!(to, 10_000);

    let mut last = 0u64;
    for now_ms in [0u64, 10, 20, 40, 80, 100] {
        let off = c.tick(now_ms).unwrap().unwrap();
        assert!(off >= last);
        last = off;
    }
    assert!(!c.is_animating());
    assert_eq!(c.viewport().scroll_top(), to);
    assert_eq!(c.tick(120).unwrap(), None);

    assert_eq!(c.start_tween_to(&5_000, Align::Start, 0, 100, Easing::Linear), None);
}

#[test]
fn user_scroll_cancels_tween() {
    let mut c = Controller::new(
        table(1_000, 200, TestDom::default()),
        ControllerOptions::default().with_scroll_debounce_ms(0),
    );
    c.start_tween_to_offset(5_000, 0, 100, Easing::Linear);
    c.tick(50).unwrap();
    assert!(c.is_animating());

    c.on_scroll(100, 60);
    assert!(!c.is_animating());
    assert_eq!(c.tick(60).unwrap(), None);
    assert_eq!(c.viewport().scroll_top(), 100);
}

#[test]
fn controller_clocks_slides_and_unblocks_rendering() {
    let dom = TestDom {
        async_animations: true,
        ..Default::default()
    };
    let mut c = Controller::new(
        table(100, 200, dom),
        ControllerOptions::default()
            .with_scroll_debounce_ms(0)
            .with_slide_duration_ms(200)
            .with_slide_easing(Easing::Linear),
    );

    let specs = (0..3)
        .map(|i| ElementSpec::new(1_000 + i, 1_000 + i).with_child_index(5 + i as usize))
        .collect();
    c.viewport_mut()
        .insert_elements(specs, Trigger::User)
        .unwrap();
    assert_eq!(c.viewport().render_state(), RenderState::Blocked);

    c.on_scroll(1_000, 20);
    c.tick(20).unwrap();
    assert_eq!(c.slides().len(), 1);
    assert_eq!(c.slides()[0].kind, AnimationKind::Show);
    assert_eq!(c.slides()[0].height_at(20, 20), 0);
    // Deferred while the slide plays.
    assert_eq!(c.viewport().view_range_rendered(), ViewRange::new(0, 23));

    c.tick(120).unwrap();
    assert_eq!(c.slides()[0].height_at(20, 120), 10);
    assert_eq!(c.viewport().render_state(), RenderState::Blocked);

    c.tick(220).unwrap();
    assert!(c.slides().is_empty());
    assert_eq!(c.viewport().render_state(), RenderState::Idle);
    assert_eq!(c.viewport().view_range_rendered(), ViewRange::new(45, 65));
    assert_eq!(c.viewport().dom().nodes, c.viewport().rendered_elements());
}

#[test]
fn finish_slides_jumps_to_the_end() {
    let dom = TestDom {
        async_animations: true,
        ..Default::default()
    };
    let mut c = Controller::new(table(100, 200, dom), ControllerOptions::default());
    c.viewport_mut()
        .delete_elements(&[3, 4], Trigger::User)
        .unwrap();
    c.tick(0).unwrap();
    assert_eq!(c.slides()[0].kind, AnimationKind::Hide);
    assert!(c.viewport().dom().nodes.contains(&3));

    c.finish_slides().unwrap();
    assert!(c.slides().is_empty());
    assert!(!c.viewport().dom().nodes.contains(&3));
    assert_eq!(c.viewport().dom().nodes, c.viewport().rendered_elements());
}

#[test]
fn anchored_change_keeps_first_visible_element() {
    let mut c = Controller::new(table(100, 200, TestDom::default()), ControllerOptions::default());
    c.scroll_to(&50, Align::Start).unwrap();
    assert_eq!(c.viewport().scroll_top(), 1_000);

    let ((), applied) = c
        .anchored(|vp| vp.insert_elements(prepend(1_000..1_010), Trigger::Program))
        .unwrap();
    assert!(applied);
    assert_eq!(c.viewport().scroll_top(), 1_200);
    assert_eq!(c.capture_first_visible_anchor().unwrap().key, 50);
}

#[test]
fn slide_tween_fractions() {
    let show = SlideTween::new(AnimationId(1), AnimationKind::Show, 0, 100, Easing::Linear);
    let hide = SlideTween::new(AnimationId(2), AnimationKind::Hide, 0, 100, Easing::Linear);
    assert_eq!(show.height_at(20, 25), 5);
    assert_eq!(hide.height_at(20, 25), 15);
    assert!(!show.is_done(99));
    assert!(hide.is_done(100));
    assert_eq!(hide.height_at(20, 500), 0);

    let zero = SlideTween::new(AnimationId(3), AnimationKind::Show, 10, 0, Easing::SmoothStep);
    assert_eq!(zero.duration_ms, 1);
    assert_eq!(zero.height_at(20, 11), 20);
}
