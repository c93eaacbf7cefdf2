//! Change notification ordering and transaction tests.

use std::cell::RefCell;
use std::rc::Rc;

use lattice_tree::model::{ItemData, ItemModel, ItemRole, ModelIndex, NodeId, TreeModel};
use lattice_tree::ModelError;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    AboutToInsert(Option<NodeId>, usize, usize),
    Inserted(Option<NodeId>, usize, usize),
    AboutToRemove(Option<NodeId>, usize, usize),
    Removed(Option<NodeId>, usize, usize),
    DataChanged(Option<NodeId>, usize, Vec<ItemRole>),
}

/// Records every row/data notification, resolving parents at emit time.
fn record(model: &Rc<TreeModel>) -> Rc<RefCell<Vec<Event>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let signals = model.signals();

    let (log, m) = (events.clone(), Rc::downgrade(model));
    signals
        .rows_about_to_be_inserted
        .connect(move |(parent, first, last)| {
            let parent = m.upgrade().and_then(|m| m.node_for_index(parent));
            log.borrow_mut()
                .push(Event::AboutToInsert(parent, *first, *last));
        });
    let (log, m) = (events.clone(), Rc::downgrade(model));
    signals.rows_inserted.connect(move |(parent, first, last)| {
        let parent = m.upgrade().and_then(|m| m.node_for_index(parent));
        log.borrow_mut().push(Event::Inserted(parent, *first, *last));
    });
    let (log, m) = (events.clone(), Rc::downgrade(model));
    signals
        .rows_about_to_be_removed
        .connect(move |(parent, first, last)| {
            let parent = m.upgrade().and_then(|m| m.node_for_index(parent));
            log.borrow_mut()
                .push(Event::AboutToRemove(parent, *first, *last));
        });
    let (log, m) = (events.clone(), Rc::downgrade(model));
    signals.rows_removed.connect(move |(parent, first, last)| {
        let parent = m.upgrade().and_then(|m| m.node_for_index(parent));
        log.borrow_mut().push(Event::Removed(parent, *first, *last));
    });
    let (log, m) = (events.clone(), Rc::downgrade(model));
    signals.data_changed.connect(move |(top_left, _, roles)| {
        let node = m.upgrade().and_then(|m| m.node_for_index(top_left));
        log.borrow_mut()
            .push(Event::DataChanged(node, top_left.column(), roles.clone()));
    });
    events
}

fn named(model: &TreeModel, name: &str) -> NodeId {
    model.create_node_with(|node| {
        node.set_data(0, ItemRole::Display, ItemData::from(name));
    })
}

#[test]
fn test_insert_announces_then_commits_single_row() {
    let model = Rc::new(TreeModel::new());
    let a = named(&model, "A");
    let b = named(&model, "B");
    model.add(a, None).unwrap();

    let events = record(&model);
    model.insert(b, None, Some(a)).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![Event::AboutToInsert(None, 0, 0), Event::Inserted(None, 0, 0)]
    );
}

#[test]
fn test_insert_under_child_reports_parent_coordinate() {
    let model = Rc::new(TreeModel::new());
    let a = named(&model, "A");
    let c1 = named(&model, "C1");
    let c2 = named(&model, "C2");
    model.add(a, None).unwrap();
    model.add(c1, Some(a)).unwrap();

    let events = record(&model);
    model.add(c2, Some(a)).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            Event::AboutToInsert(Some(a), 1, 1),
            Event::Inserted(Some(a), 1, 1)
        ]
    );
}

#[test]
fn test_announce_sees_old_layout_and_commit_sees_new() {
    let model = Rc::new(TreeModel::new());
    let a = named(&model, "A");
    let b = named(&model, "B");
    let g = named(&model, "G");
    model.add(a, None).unwrap();
    model.add(b, None).unwrap();
    model.add(g, Some(a)).unwrap();

    let g_index = model.index_for_node(g, 0);
    let observed = Rc::new(RefCell::new(Vec::new()));

    let (seen, m, held) = (observed.clone(), Rc::downgrade(&model), g_index.clone());
    model.signals().rows_about_to_be_removed.connect(move |_| {
        if let Some(m) = m.upgrade() {
            seen.borrow_mut().push((
                "announce",
                m.node_for_index(&held),
                m.row_count(&ModelIndex::invalid()),
                m.row_in_parent(b),
            ));
        }
    });
    let (seen, m, held) = (observed.clone(), Rc::downgrade(&model), g_index);
    model.signals().rows_removed.connect(move |_| {
        if let Some(m) = m.upgrade() {
            seen.borrow_mut().push((
                "commit",
                m.node_for_index(&held),
                m.row_count(&ModelIndex::invalid()),
                m.row_in_parent(b),
            ));
        }
    });

    model.remove(a, None).unwrap();

    assert_eq!(
        *observed.borrow(),
        vec![
            ("announce", Some(g), 2, Some(1)),
            ("commit", None, 1, Some(0)),
        ]
    );
}

#[test]
fn test_move_is_remove_then_insert() {
    let model = Rc::new(TreeModel::new());
    let a = named(&model, "A");
    let b = named(&model, "B");
    let x = named(&model, "X");
    model.add(a, None).unwrap();
    model.add(b, None).unwrap();
    model.add(x, Some(a)).unwrap();

    let events = record(&model);
    model.move_node(x, Some(b), None).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            Event::AboutToRemove(Some(a), 0, 0),
            Event::Removed(Some(a), 0, 0),
            Event::AboutToInsert(Some(b), 0, 0),
            Event::Inserted(Some(b), 0, 0),
        ]
    );
}

#[test]
fn test_rejected_mutations_emit_nothing() {
    let model = Rc::new(TreeModel::new());
    let a = named(&model, "A");
    let b = named(&model, "B");
    let stray = named(&model, "Stray");
    model.add(a, None).unwrap();
    model.add(b, Some(a)).unwrap();

    let events = record(&model);

    assert!(matches!(
        model.add(b, None),
        Err(ModelError::AlreadyAttached { .. })
    ));
    assert!(matches!(
        model.remove(b, None),
        Err(ModelError::NotAChild { .. })
    ));
    assert!(matches!(
        model.insert(stray, Some(a), Some(a)),
        Err(ModelError::NotAChild { .. })
    ));
    assert!(matches!(
        model.move_node(a, Some(b), None),
        Err(ModelError::CircularParentage { .. })
    ));
    assert!(model.remove(a, Some(b)).is_err_and(|e| e.is_structural()));

    assert!(events.borrow().is_empty());
    assert_eq!(model.children(a), vec![b]);
    assert!(!model.is_attached(stray));
}

#[test]
fn test_set_data_notifies_only_on_change() {
    let model = Rc::new(TreeModel::with_headers(["Name", "Size"]));
    let a = named(&model, "A");
    model.add(a, None).unwrap();
    let events = record(&model);

    let index = model.index_for_node(a, 1);
    assert_eq!(
        model.try_set_data(&index, ItemData::from(10), ItemRole::Edit),
        Ok(true)
    );
    assert_eq!(
        model.try_set_data(&index, ItemData::from(10), ItemRole::Edit),
        Ok(false)
    );

    assert_eq!(
        *events.borrow(),
        vec![Event::DataChanged(Some(a), 1, vec![ItemRole::Edit])]
    );
}

#[test]
fn test_observer_cannot_mutate_during_announce() {
    let model = Rc::new(TreeModel::new());
    let a = named(&model, "A");
    let b = named(&model, "B");
    model.add(a, None).unwrap();

    let results = Rc::new(RefCell::new(Vec::new()));
    let (out, m) = (results.clone(), Rc::downgrade(&model));
    model.signals().rows_about_to_be_inserted.connect(move |_| {
        if let Some(m) = m.upgrade() {
            out.borrow_mut().push(m.remove(a, None));
            out.borrow_mut().push(
                m.set_node_data(a, 0, ItemRole::Display, ItemData::from("Z"))
                    .map(|_| ()),
            );
            out.borrow_mut().push(m.clear());
        }
    });

    model.add(b, None).unwrap();

    assert_eq!(
        *results.borrow(),
        vec![
            Err(ModelError::ReentrantMutation("remove")),
            Err(ModelError::ReentrantMutation("set node data")),
            Err(ModelError::ReentrantMutation("clear")),
        ]
    );
    assert_eq!(model.children(model.root()), vec![a, b]);
    assert_eq!(
        model.node_data(a, 0, ItemRole::Display).as_string(),
        Some("A")
    );

    // The guard is released once the transaction completes.
    assert!(model.remove(b, None).is_ok());
}

#[test]
fn test_blocked_signals_still_mutate() {
    let model = Rc::new(TreeModel::new());
    let events = record(&model);
    let a = named(&model, "A");

    model.signals().rows_inserted.set_blocked(true);
    model.add(a, None).unwrap();
    model.signals().rows_inserted.set_blocked(false);

    assert_eq!(*events.borrow(), vec![Event::AboutToInsert(None, 0, 0)]);
    assert!(model.is_attached(a));
}
