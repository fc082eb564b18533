use rowport::{
    Align, DomAdapter, Element, ElementMarkers, ElementSpec, Extent, InsertPosition, Trigger,
    Viewport, ViewportOptions,
};
use rowport_adapter::{Controller, ControllerOptions, Easing};

#[derive(Default)]
struct Dom {
    nodes: Vec<u32>,
}

impl DomAdapter<u32, ()> for Dom {
    type Markup = ();

    fn build_markup(&self, _element: &Element<u32, ()>) -> Self::Markup {}

    fn insert_at(&mut self, position: InsertPosition<u32>, batch: Vec<(u32, ())>) {
        let at = match position {
            InsertPosition::Start => 0,
            InsertPosition::After(key) => self
                .nodes
                .iter()
                .position(|k| *k == key)
                .map_or(self.nodes.len(), |i| i + 1),
        };
        self.nodes.splice(at..at, batch.into_iter().map(|(k, ())| k));
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
            width: 300,
        })
    }

    fn update_fillers(&mut self, _before: u64, _after: u64) {}

    fn apply_markers(&mut self, _key: &u32, _markers: &ElementMarkers) {}

    // Animate through the controller's slide clock.
    fn start_animation(
        &mut self,
        _id: rowport::AnimationId,
        _kind: rowport::AnimationKind,
        _keys: &[u32],
    ) -> bool {
        true
    }
}

fn main() {
    // Example: a controller driving tween scrolling and slide animations without holding any
    // UI objects.
    //
    // An adapter would:
    // - forward scroll/resize events with a timestamp
    // - call tick(now_ms) in a frame loop / timer
    // - apply the returned offset to the real scroll container (if any)
    // - size animated rows from slides()
    let mut vp = Viewport::new(
        ViewportOptions::table().with_average_element_height(20),
        Dom::default(),
    );
    let rows = (0..10_000u32).map(|k| ElementSpec::new(k, ())).collect();
    vp.insert_elements(rows, Trigger::Program)
        .expect("fresh keys");
    vp.set_viewport_height(400).expect("render");

    let mut c = Controller::new(vp, ControllerOptions::default());
    let target = c
        .start_tween_to(&2_000, Align::Center, 0, 240, Easing::SmoothStep)
        .expect("row is visible");
    println!("target_offset={target}");

    let mut now_ms = 0u64;
    while let Some(off) = c.tick(now_ms).expect("render") {
        if now_ms % 80 == 0 {
            println!(
                "t={now_ms} off={off} rendered={:?}",
                c.viewport().view_range_rendered()
            );
        }
        now_ms += 16;
    }

    c.viewport_mut()
        .delete_elements(&[2_000, 2_001], Trigger::User)
        .expect("known keys");
    while !c.viewport().running_animations().is_empty() {
        c.tick(now_ms).expect("render");
        if let Some(slide) = c.slides().first() {
            println!("t={now_ms} hiding at {}px", slide.height_at(20, now_ms));
        }
        now_ms += 16;
    }

    println!(
        "done: off={} rendered={:?}",
        c.viewport().scroll_top(),
        c.viewport().view_range_rendered()
    );
}
