/// Diagnostic tool to verify records → tree → layout → zoom pipeline
use std::path::PathBuf;
use std::time::Duration;

use sunburst_rs::layout::Frame;
use sunburst_rs::render::colors::palette_color;
use sunburst_rs::render::{FocusInfo, FrameUpdate, LegendEntry, RenderAdapter, SunburstScene};
use sunburst_rs::tree::arena::{CategoryTree, NodeId};
use sunburst_rs::{DatasetSchema, DimensionId, Record, RecordStore, SunburstChart, SunburstConfig};

/// Prints what a real renderer would receive.
struct ConsoleAdapter {
    frames: usize,
}

impl RenderAdapter for ConsoleAdapter {
    fn draw(&mut self, scene: &SunburstScene) {
        println!(
            "    draw: {} arcs ({} visible), {} rings",
            scene.arcs.len(),
            scene.visible_arcs().count(),
            scene.max_depth
        );
    }

    fn update_frames(&mut self, _updates: &[FrameUpdate], progress: f64) {
        self.frames += 1;
        if progress >= 1.0 {
            println!("    transition complete after {} frames", self.frames);
            self.frames = 0;
        }
    }

    fn focus_changed(&mut self, focus: &FocusInfo, legend: &[LegendEntry]) {
        println!("    focus: '{}' ({})", focus.center_label, focus.path_key);
        for entry in legend {
            println!(
                "      legend[{}] {} {} = {}{}",
                entry.color_slot,
                palette_color(entry.color_slot),
                entry.display_name(20),
                entry.value,
                if entry.clickable { " (clickable)" } else { "" }
            );
        }
    }

    fn show_empty_state(&mut self, message: &str) {
        println!("    empty: {}", message);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sunburst_rs=debug".parse()?),
        )
        .init();

    let data_path = std::env::args().nth(1).map(PathBuf::from);

    println!("=== DIAGNOSTIC: Records → Tree → Layout → Zoom ===");

    // Load
    let store = match &data_path {
        Some(path) => {
            println!("Loading: {}", path.display());
            let json = std::fs::read_to_string(path)?;
            RecordStore::from_json_str(&DatasetSchema::default(), &json)?
        }
        None => {
            println!("Loading: built-in sample");
            sample_store()?
        }
    };
    println!("\n[1] Loaded {} records, total {}", store.len(), store.total_measure());

    // Build
    let gender = store.dimension("gender").unwrap_or(DimensionId(1));
    let config = SunburstConfig {
        active_dimensions: vec![gender],
        ..SunburstConfig::default()
    };
    let mut chart = SunburstChart::new(store, config)?;
    let tree = chart.tree();
    println!("\n[2] Tree built: {} nodes, height {}", tree.len(), tree.height());
    print_subtree(tree, tree.root, 0);

    // Draw
    let mut adapter = ConsoleAdapter { frames: 0 };
    println!("\n[3] Initial render:");
    chart.render(&mut adapter);

    if let Some(first) = chart.tree().children(chart.tree().root).next() {
        if let Some(text) = chart.tooltip_text(first) {
            println!("    tooltip:\n      {}", text.replace('\n', "\n      "));
        }
    }

    // Zoom into the largest branch and back out
    let target = chart
        .tree()
        .children(chart.tree().root)
        .find(|&id| chart.tree().get(id).has_children());
    match target {
        Some(node) => {
            println!("\n[4] Zoom into '{}':", chart.tree().get(node).name);
            chart.activate(node, &mut adapter);
            run_transition(&mut chart, &mut adapter);

            println!("\n[5] Zoom out:");
            chart.zoom_out(&mut adapter);
            run_transition(&mut chart, &mut adapter);
        }
        None => println!("\n[4] No branch to zoom into"),
    }

    // Rebuild without folding; focus stays put
    println!("\n[6] Aggregation off:");
    chart.set_aggregation(false, &mut adapter)?;
    println!("    root children: {}", chart.tree().children(chart.tree().root).count());

    println!("\n=== DIAGNOSTIC COMPLETE ===");
    Ok(())
}

fn run_transition(chart: &mut SunburstChart, adapter: &mut ConsoleAdapter) {
    let frame = Duration::from_millis(16);
    while chart.zoom().is_transitioning() {
        chart.tick(frame, adapter);
    }
}

fn print_subtree(tree: &CategoryTree, id: NodeId, indent: usize) {
    let node = tree.get(id);
    println!(
        "    {:indent$}{} = {} {}{}",
        "",
        node.name,
        node.value,
        describe(&node.layout),
        if node.is_aggregated {
            format!(" [folds {}]", node.aggregated_details.len())
        } else {
            String::new()
        },
        indent = indent * 2
    );
    for child in tree.children(id) {
        print_subtree(tree, child, indent + 1);
    }
}

fn describe(frame: &Frame) -> String {
    format!(
        "[{:.1}°..{:.1}°, ring {}..{}]",
        frame.angle_start.to_degrees(),
        frame.angle_end.to_degrees(),
        frame.depth_start,
        frame.depth_end
    )
}

fn sample_store() -> anyhow::Result<RecordStore> {
    let mut store = RecordStore::new(&["age", "gender"]);
    for (category, age, gender, measure) in [
        ("driver", "17_to_25", "Male", 85.0),
        ("pedestrian", "26_to_39", "Male", 10.0),
        ("cyclist", "17_to_25", "Male", 1.0),
        ("passenger", "40_to_64", "Male", 4.0),
        ("driver", "40_to_64", "Female", 40.0),
        ("motorcyclist", "", "Female", 6.0),
    ] {
        let record = Record::new(category, measure);
        let record = if age.is_empty() {
            record
        } else {
            record.with_attribute(DimensionId(0), age)
        };
        store.push(record.with_attribute(DimensionId(1), gender))?;
    }
    Ok(store)
}
