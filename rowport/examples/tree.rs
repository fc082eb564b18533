// Example: a tree with expansion, filtering, selection and check propagation.
use rowport::{
    CheckPropagation, DomAdapter, Element, ElementMarkers, ElementSpec, Extent, InsertPosition,
    Trigger, Viewport, ViewportOptions,
};

/// Keeps materialized keys in order and prints every marker change.
#[derive(Default)]
struct LogDom {
    nodes: Vec<u32>,
}

impl DomAdapter<u32, &'static str> for LogDom {
    type Markup = ();

    fn build_markup(&self, _element: &Element<u32, &'static str>) -> Self::Markup {}

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
            width: 200,
        })
    }

    fn update_fillers(&mut self, _before: u64, _after: u64) {}

    fn apply_markers(&mut self, key: &u32, markers: &ElementMarkers) {
        println!("  markers {key}: {markers:?}");
    }
}

fn main() -> Result<(), rowport::StructuralError<u32>> {
    let options = ViewportOptions::tree()
        .with_average_element_height(20)
        .with_multi_select(true)
        .with_check_propagation(CheckPropagation::ChildrenAndParents);
    let mut vp = Viewport::new(options, LogDom::default());
    vp.set_viewport_height(200)?;

    vp.insert_elements(
        vec![
            ElementSpec::new(1, "src").with_expanded(true),
            ElementSpec::new(2, "lib.rs").with_parent(1),
            ElementSpec::new(3, "main.rs").with_parent(1),
            ElementSpec::new(4, "tests"),
            ElementSpec::new(5, "smoke.rs").with_parent(4),
        ],
        Trigger::Program,
    )?;
    println!("visible={:?}", vp.visible_elements());

    vp.expand(&4, Trigger::User)?;
    println!("after expand: visible={:?}", vp.visible_elements());

    println!("select 2, 3:");
    vp.select_elements([2, 3]);

    println!("check 2, 3:");
    vp.check_elements(&[2, 3], true)?;
    println!("checked={:?}", vp.checked_elements());

    vp.add_filter("rust", |e: &Element<u32, &'static str>| e.data().ends_with(".rs"))?;
    println!("filtered: visible={:?}", vp.visible_elements());

    let state = vp.state();
    println!("state={state:?}");
    Ok(())
}
