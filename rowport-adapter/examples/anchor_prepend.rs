use rowport::{
    DomAdapter, Element, ElementMarkers, ElementSpec, Extent, InsertPosition, Trigger, Viewport,
    ViewportOptions,
};
use rowport_adapter::{Controller, ControllerOptions};

#[derive(Default)]
struct Dom {
    nodes: Vec<u64>,
}

impl DomAdapter<u64, ()> for Dom {
    type Markup = ();

    fn build_markup(&self, _element: &Element<u64, ()>) -> Self::Markup {}

    fn insert_at(&mut self, position: InsertPosition<u64>, batch: Vec<(u64, ())>) {
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

    fn remove_at(&mut self, key: &u64) {
        self.nodes.retain(|k| k != key);
    }

    fn is_materialized(&self, key: &u64) -> bool {
        self.nodes.contains(key)
    }

    fn measure(&mut self, _key: &u64) -> Option<Extent> {
        Some(Extent {
            height: 40,
            width: 600,
        })
    }

    fn update_fillers(&mut self, _before: u64, _after: u64) {}

    fn apply_markers(&mut self, _key: &u64, _markers: &ElementMarkers) {}
}

fn main() {
    // Example: load older messages above a chat timeline without the content jumping.
    //
    // The flow is:
    // 1) capture an anchor (key + position relative to the scroll top)
    // 2) apply the structural change
    // 3) re-apply the anchor so the same message stays in the same place
    let mut vp = Viewport::new(
        ViewportOptions::table().with_average_element_height(40),
        Dom::default(),
    );
    let messages = (1_000u64..1_100).map(|k| ElementSpec::new(k, ())).collect();
    vp.insert_elements(messages, Trigger::Program)
        .expect("fresh keys");
    vp.set_viewport_and_scroll(400, 2_000).expect("render");

    let mut c = Controller::new(vp, ControllerOptions::default());
    let anchor = c
        .capture_first_visible_anchor()
        .expect("timeline is not empty");
    println!(
        "before prepend: scroll_top={} anchor={anchor:?}",
        c.viewport().scroll_top()
    );

    let older = (0..10u64)
        .map(|i| ElementSpec::new(2_000 + i, ()).with_child_index(i as usize))
        .collect();
    c.viewport_mut()
        .insert_elements(older, Trigger::Program)
        .expect("fresh keys");
    let ok = c.apply_anchor(&anchor).expect("render");

    println!(
        "after prepend: ok={ok} scroll_top={} first_visible={:?}",
        c.viewport().scroll_top(),
        c.capture_first_visible_anchor().map(|a| a.key)
    );
}
