//! Builds a small document outline, reshapes it, and prints the tree after
//! each step together with the notifications a view would receive.
//!
//! Run with `RUST_LOG=lattice_tree=debug cargo run --example outline` to see
//! the model's own tracing output.

use lattice_tree::model::{ItemData, ItemModel, ItemRole, ModelIndex, NodeId, TreeDebug, TreeModel};
use lattice_tree::{ModelResult, TreeFormatOptions, TreeStyle};
use tracing_subscriber::EnvFilter;

fn heading(model: &TreeModel, title: &str, words: i64) -> NodeId {
    model.create_node_with(|node| {
        node.set_data(0, ItemRole::Display, ItemData::from(title));
        node.set_data(1, ItemRole::Display, ItemData::from(words));
    })
}

fn print(model: &TreeModel, step: &str) {
    let options = TreeFormatOptions {
        style: TreeStyle::Unicode,
        show_ids: false,
        show_rows: true,
        ..Default::default()
    };
    println!("\n== {step}");
    print!("{}", TreeDebug::with_options(model, options));
}

fn main() -> ModelResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let model = TreeModel::with_headers(["Heading", "Words"]);

    model.signals().rows_inserted.connect(|(parent, first, last)| {
        println!("  view: rows {first}..={last} inserted under {parent:?}");
    });
    model.signals().rows_removed.connect(|(parent, first, last)| {
        println!("  view: rows {first}..={last} removed under {parent:?}");
    });
    model.signals().data_changed.connect(|(top_left, _, roles)| {
        println!(
            "  view: cell ({}, {}) changed {roles:?}",
            top_left.row(),
            top_left.column()
        );
    });

    let intro = heading(&model, "Introduction", 320);
    let design = heading(&model, "Design", 1200);
    let storage = heading(&model, "Storage", 540);
    let appendix = heading(&model, "Appendix", 90);

    model.add(intro, None)?;
    model.add(design, None)?;
    model.add(storage, Some(design))?;
    model.add(appendix, None)?;
    print(&model, "initial outline");

    // Promote "Storage" to a top-level section before the appendix.
    model.move_node(storage, None, Some(appendix))?;
    print(&model, "after promoting Storage");

    let words = model.index_for_node(design, 1);
    model.try_set_data(&words, ItemData::from(980), ItemRole::Display)?;

    let root = ModelIndex::invalid();
    let total: i64 = (0..model.row_count(&root))
        .filter_map(|row| model.data(&model.index(row, 1, &root), ItemRole::Display).as_int())
        .sum();
    println!("\ntotal words in top-level sections: {total}");

    model.delete(appendix, None)?;
    print(&model, "after deleting Appendix");

    Ok(())
}
