// Example: a large table, scrolled and jumped around, against a string "DOM".
use rowport::{
    Align, DomAdapter, Element, ElementMarkers, ElementSpec, Extent, InsertPosition, Trigger,
    Viewport, ViewportOptions,
};

#[derive(Default)]
struct StringDom {
    rows: Vec<(u32, String)>,
    fillers: (u64, u64),
}

impl DomAdapter<u32, String> for StringDom {
    type Markup = String;

    fn build_markup(&self, element: &Element<u32, String>) -> String {
        format!("<tr>{}</tr>", element.data())
    }

    fn insert_at(&mut self, position: InsertPosition<u32>, batch: Vec<(u32, String)>) {
        let at = match position {
            InsertPosition::Start => 0,
            InsertPosition::After(key) => self
                .rows
                .iter()
                .position(|(k, _)| *k == key)
                .map_or(self.rows.len(), |i| i + 1),
        };
        self.rows.splice(at..at, batch);
    }

    fn remove_at(&mut self, key: &u32) {
        self.rows.retain(|(k, _)| k != key);
    }

    fn is_materialized(&self, key: &u32) -> bool {
        self.rows.iter().any(|(k, _)| k == key)
    }

    fn measure(&mut self, _key: &u32) -> Option<Extent> {
        Some(Extent {
            height: 24,
            width: 320,
        })
    }

    fn update_fillers(&mut self, before: u64, after: u64) {
        self.fillers = (before, after);
    }

    fn apply_markers(&mut self, _key: &u32, _markers: &ElementMarkers) {}
}

fn main() {
    let options = ViewportOptions::table().with_average_element_height(24);
    let mut vp = Viewport::new(options, StringDom::default());
    let specs = (0..100_000u32)
        .map(|i| ElementSpec::new(i, format!("row {i}")))
        .collect();
    vp.insert_elements(specs, Trigger::Program)
        .expect("fresh keys");
    vp.set_viewport_and_scroll(480, 123_456).expect("render");

    println!("total_height={}", vp.total_height());
    println!("rendered={:?}", vp.view_range_rendered());
    println!("fillers={:?}", vp.dom().fillers);
    println!("first_row={:?}", vp.dom().rows.first());

    let off = vp.scroll_to(&99_999, Align::End).expect("render");
    println!("after scroll_to: offset={off:?} rendered={:?}", vp.view_range_rendered());
}
