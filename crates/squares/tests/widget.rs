//! End-to-end behaviour of a mounted grid driven through pointer moves and
//! clicks.

use squares::prelude::*;
use squares::{DomError, GridElements, RowSnapshot};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A document with a `#grid` mount point and the geometry variables set.
fn setup() -> Document {
    init_tracing();
    let doc = Document::new();
    RootVariables::from_css(
        ":root { --square-size: 40px; --square-offset: 3px; --square-border-width: 1px; }",
    )
    .unwrap()
    .apply(&doc);
    add_mount_point(&doc, "grid");
    doc
}

fn add_mount_point(doc: &Document, id: &str) {
    let root = doc.create_element("div");
    doc.with_write(|t| t.set_attribute(root, "id", id)).unwrap();
    doc.append_child(doc.body(), root).unwrap();
}

fn mount(doc: &Document) -> Squares {
    Squares::mount(doc, "#grid", SquaresConfig::default())
        .unwrap()
        .expect("mount point exists")
}

fn cell(squares: &Squares, row: usize, column: usize) -> NodeId {
    let wrapper = squares.elements().wrapper(squares.document());
    let cell = wrapper
        .find(&format!(r#"tr[data-row="{row}"] td[data-column="{column}"]"#))
        .unwrap();
    assert_eq!(cell.len(), 1, "no cell at {row}x{column}");
    cell.first().unwrap()
}

fn hover(squares: &Squares, row: usize, column: usize) {
    squares
        .document()
        .move_pointer(Some(cell(squares, row, column)))
        .unwrap();
}

fn click(squares: &Squares, control: impl Fn(&GridElements) -> NodeId) {
    let node = control(&squares.elements());
    assert_eq!(squares.document().click(node).unwrap(), 1);
}

fn row_indices(snapshot: &[RowSnapshot]) -> Vec<Option<usize>> {
    snapshot.iter().map(|row| row.index).collect()
}

fn style(doc: &Document, node: NodeId, property: &str) -> Option<String> {
    doc.with_read(|t| t.style_property(node, property).map(|v| v.map(String::from)))
        .unwrap()
}

fn has_show(doc: &Document, node: NodeId) -> bool {
    doc.with_read(|t| t.has_class(node, "show")).unwrap()
}

#[test]
fn mounts_a_four_by_four_grid() {
    let doc = setup();
    let squares = mount(&doc);

    assert_eq!(squares.shape().unwrap(), GridShape { rows: 4, columns: 4 });
    let snapshot = squares.snapshot().unwrap();
    assert_eq!(row_indices(&snapshot), vec![Some(1), Some(2), Some(3), Some(4)]);
    for row in &snapshot {
        assert_eq!(row.cells, vec![Some(1), Some(2), Some(3), Some(4)]);
    }
    squares.check_invariants().unwrap();
    assert_eq!(squares.minus_visibility(), MinusVisibility::Hidden);
    assert_eq!(squares.hover_selection(), HoverSelection::default());
}

#[test]
fn add_column_click_appends_a_cell_to_every_row() {
    let doc = setup();
    let squares = mount(&doc);

    hover(&squares, 2, 3);
    click(&squares, |e| e.plus_column);

    assert_eq!(squares.shape().unwrap(), GridShape { rows: 4, columns: 5 });
    let snapshot = squares.snapshot().unwrap();
    assert_eq!(row_indices(&snapshot), vec![Some(1), Some(2), Some(3), Some(4)]);
    assert!(snapshot.iter().all(|row| row.cells.last() == Some(&Some(5))));
    squares.check_invariants().unwrap();
    // Adding leaves the minus controls as they were.
    assert_eq!(squares.minus_visibility(), MinusVisibility::Shown);
}

#[test]
fn add_row_click_appends_a_matching_row() {
    let doc = setup();
    let squares = mount(&doc);

    hover(&squares, 3, 1);
    click(&squares, |e| e.plus_row);

    assert_eq!(squares.shape().unwrap(), GridShape { rows: 5, columns: 4 });
    let snapshot = squares.snapshot().unwrap();
    assert_eq!(snapshot[4].index, Some(5));
    assert_eq!(snapshot[4].cells, vec![Some(1), Some(2), Some(3), Some(4)]);
    assert_eq!(squares.elements().rows.len(), 5);
    squares.check_invariants().unwrap();
}

#[test]
fn new_rows_respond_to_hover() {
    let doc = setup();
    let squares = mount(&doc);
    squares.add_row().unwrap();

    hover(&squares, 5, 2);
    assert_eq!(
        squares.hover_selection(),
        HoverSelection {
            row: Some(5),
            column: Some(2)
        }
    );
    let minus_row = squares.elements().minus_row;
    assert_eq!(style(&doc, minus_row, "top").as_deref(), Some("207px"));
}

#[test]
fn remove_row_click_renumbers_remaining_rows() {
    let doc = setup();
    let squares = mount(&doc);
    let before: Vec<NodeId> = squares.elements().rows;

    hover(&squares, 2, 1);
    assert_eq!(squares.minus_visibility(), MinusVisibility::Shown);
    click(&squares, |e| e.minus_row);

    let after = squares.elements().rows;
    assert_eq!(after, vec![before[0], before[2], before[3]]);
    assert_eq!(
        row_indices(&squares.snapshot().unwrap()),
        vec![Some(1), Some(2), Some(3)]
    );
    assert!(!doc.with_read(|t| t.contains(before[1])));
    assert_eq!(squares.minus_visibility(), MinusVisibility::Hidden);
    squares.check_invariants().unwrap();
}

#[test]
fn remove_column_click_renumbers_every_row() {
    let doc = setup();
    let squares = mount(&doc);

    hover(&squares, 1, 2);
    click(&squares, |e| e.minus_column);

    assert_eq!(squares.shape().unwrap(), GridShape { rows: 4, columns: 3 });
    for row in squares.snapshot().unwrap() {
        assert_eq!(row.cells, vec![Some(1), Some(2), Some(3)]);
    }
    assert_eq!(squares.minus_visibility(), MinusVisibility::Hidden);
    squares.check_invariants().unwrap();
}

#[test]
fn single_row_is_never_removed() {
    let doc = setup();
    let squares = Squares::mount(&doc, "#grid", SquaresConfig::default().with_shape(1, 3))
        .unwrap()
        .unwrap();

    hover(&squares, 1, 1);
    click(&squares, |e| e.minus_row);
    assert_eq!(squares.shape().unwrap(), GridShape { rows: 1, columns: 3 });
    assert_eq!(squares.remove_row().unwrap(), CommandOutcome::AtMinimum);
    squares.check_invariants().unwrap();
}

#[test]
fn single_column_is_never_removed() {
    let doc = setup();
    let squares = Squares::mount(&doc, "#grid", SquaresConfig::default().with_shape(2, 1))
        .unwrap()
        .unwrap();

    hover(&squares, 2, 1);
    assert_eq!(squares.remove_column().unwrap(), CommandOutcome::AtMinimum);
    assert_eq!(squares.shape().unwrap(), GridShape { rows: 2, columns: 1 });
}

#[test]
fn removal_without_hover_is_refused() {
    let doc = setup();
    let squares = mount(&doc);

    assert_eq!(squares.remove_row().unwrap(), CommandOutcome::NoHoverSelection);
    assert_eq!(squares.remove_column().unwrap(), CommandOutcome::NoHoverSelection);
    assert_eq!(squares.shape().unwrap(), GridShape { rows: 4, columns: 4 });
}

#[test]
fn stale_selection_is_reported() {
    let doc = setup();
    let squares = mount(&doc);

    // Row 4 is hovered, then the pointer leaves without hovering another row.
    hover(&squares, 4, 4);
    doc.move_pointer(None).unwrap();
    assert_eq!(squares.remove_row().unwrap(), CommandOutcome::Applied);

    // The selection still names row 4, which no longer exists.
    let err = squares.remove_row().unwrap_err();
    assert!(matches!(
        err.as_dom(),
        Some(DomError::IndexOutOfRange { index: 3, len: 3 })
    ));
    // Column 4 still exists.
    assert_eq!(squares.remove_column().unwrap(), CommandOutcome::Applied);
    squares.check_invariants().unwrap();
}

#[test]
fn stale_column_removal_leaves_grid_unchanged() {
    let doc = setup();
    let squares = mount(&doc);

    hover(&squares, 1, 4);
    doc.move_pointer(None).unwrap();
    assert_eq!(squares.remove_column().unwrap(), CommandOutcome::Applied);
    let shape = squares.shape().unwrap();
    let snapshot = squares.snapshot().unwrap();

    // Column 4 is gone from every row, so no row is touched.
    let err = squares.remove_column().unwrap_err();
    assert!(matches!(
        err.as_dom(),
        Some(DomError::IndexOutOfRange { index: 3, len: 3 })
    ));
    assert_eq!(squares.shape().unwrap(), shape);
    assert_eq!(squares.snapshot().unwrap(), snapshot);

    // Through the control the failure is logged and the grid stays intact.
    click(&squares, |e| e.minus_column);
    assert_eq!(squares.shape().unwrap(), GridShape { rows: 4, columns: 3 });
    assert_eq!(squares.snapshot().unwrap(), snapshot);
    squares.check_invariants().unwrap();
}

#[test]
fn add_then_remove_row_restores_the_grid() {
    let doc = setup();
    let squares = mount(&doc);
    let before = squares.snapshot().unwrap();

    squares.add_row().unwrap();
    hover(&squares, 5, 1);
    assert_eq!(squares.remove_row().unwrap(), CommandOutcome::Applied);

    assert_eq!(squares.snapshot().unwrap(), before);
    squares.check_invariants().unwrap();
}

#[test]
fn invariants_hold_across_a_command_walk() {
    let doc = setup();
    let squares = mount(&doc);

    // A fixed pseudo-random walk over hover targets and commands.
    let mut seed: u64 = 0x5eed;
    let mut next = |bound: usize| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((seed >> 33) as usize) % bound
    };

    for _ in 0..200 {
        let shape = squares.shape().unwrap();
        hover(&squares, next(shape.rows) + 1, next(shape.columns) + 1);
        let command = match next(4) {
            0 => Command::AddColumn,
            1 => Command::AddRow,
            2 => Command::RemoveRow,
            _ => Command::RemoveColumn,
        };
        let outcome = squares.execute(command).unwrap();
        assert_ne!(outcome, CommandOutcome::NoHoverSelection);
        squares.check_invariants().unwrap();
        let shape = squares.shape().unwrap();
        assert!(shape.rows >= 1 && shape.columns >= 1);
    }
}

#[test]
fn moving_from_a_cell_to_a_minus_control_keeps_it_visible() {
    let doc = setup();
    let squares = mount(&doc);
    let elements = squares.elements();

    hover(&squares, 2, 2);
    doc.move_pointer(Some(elements.minus_row)).unwrap();
    assert_eq!(squares.minus_visibility(), MinusVisibility::Shown);
    assert!(has_show(&doc, elements.minus_row));
    assert!(has_show(&doc, elements.minus_column));

    // Between the two controls.
    doc.move_pointer(Some(elements.minus_column)).unwrap();
    assert_eq!(squares.minus_visibility(), MinusVisibility::Shown);

    // And back onto the table.
    doc.move_pointer(Some(cell(&squares, 1, 1))).unwrap();
    assert_eq!(squares.minus_visibility(), MinusVisibility::Shown);
}

#[test]
fn leaving_the_region_hides_the_controls() {
    let doc = setup();
    let squares = mount(&doc);
    let elements = squares.elements();

    hover(&squares, 1, 1);
    doc.move_pointer(Some(doc.body())).unwrap();
    assert_eq!(squares.minus_visibility(), MinusVisibility::Hidden);
    assert!(!has_show(&doc, elements.minus_row));

    hover(&squares, 1, 1);
    doc.move_pointer(Some(elements.plus_row)).unwrap();
    doc.move_pointer(None).unwrap();
    assert_eq!(squares.minus_visibility(), MinusVisibility::Hidden);
}

#[test]
fn hover_positions_the_minus_controls() {
    let doc = setup();
    let squares = mount(&doc);
    let elements = squares.elements();

    hover(&squares, 3, 2);
    assert_eq!(style(&doc, elements.minus_row, "top").as_deref(), Some("125px"));
    assert_eq!(style(&doc, elements.minus_column, "left").as_deref(), Some("84px"));
    assert_eq!(
        squares.hover_selection(),
        HoverSelection {
            row: Some(3),
            column: Some(2)
        }
    );
}

#[test]
fn hover_without_geometry_still_selects() {
    init_tracing();
    let doc = Document::new();
    add_mount_point(&doc, "grid");
    let squares = mount(&doc);
    let elements = squares.elements();

    hover(&squares, 2, 4);
    assert_eq!(
        squares.hover_selection(),
        HoverSelection {
            row: Some(2),
            column: Some(4)
        }
    );
    assert_eq!(squares.minus_visibility(), MinusVisibility::Shown);
    assert_eq!(style(&doc, elements.minus_row, "top"), None);
    assert_eq!(style(&doc, elements.minus_column, "left"), None);

    assert_eq!(squares.remove_column().unwrap(), CommandOutcome::Applied);
    squares.check_invariants().unwrap();
}

#[test]
fn hovering_the_row_gap_keeps_the_column() {
    let doc = setup();
    let squares = mount(&doc);
    let row = squares.elements().rows[0];

    hover(&squares, 2, 3);
    doc.move_pointer(Some(row)).unwrap();
    assert_eq!(
        squares.hover_selection(),
        HoverSelection {
            row: Some(1),
            column: Some(3)
        }
    );
}

#[test]
fn mounts_are_independent() {
    let doc = setup();
    add_mount_point(&doc, "other");
    let first = mount(&doc);
    let second = Squares::mount(&doc, "#other", SquaresConfig::default().with_shape(2, 2))
        .unwrap()
        .unwrap();

    hover(&first, 3, 3);
    assert_eq!(first.minus_visibility(), MinusVisibility::Shown);
    assert_eq!(second.hover_selection(), HoverSelection::default());
    assert_eq!(second.remove_row().unwrap(), CommandOutcome::NoHoverSelection);

    click(&first, |e| e.plus_column);
    assert_eq!(first.shape().unwrap(), GridShape { rows: 4, columns: 5 });
    assert_eq!(second.shape().unwrap(), GridShape { rows: 2, columns: 2 });

    click(&second, |e| e.plus_row);
    assert_eq!(first.shape().unwrap().rows, 4);
    assert_eq!(second.shape().unwrap().rows, 3);

    first.check_invariants().unwrap();
    second.check_invariants().unwrap();
}

#[test]
fn missing_mount_point_does_nothing() {
    init_tracing();
    let doc = Document::new();
    let nodes = doc.node_count();

    let squares = Squares::mount(&doc, "#nowhere", SquaresConfig::default()).unwrap();
    assert!(squares.is_none());
    assert_eq!(doc.node_count(), nodes);
}

#[test]
fn invalid_config_is_rejected_before_mounting() {
    let doc = setup();
    let nodes = doc.node_count();

    let err = Squares::mount(&doc, "#grid", SquaresConfig::default().with_shape(0, 4)).unwrap_err();
    assert!(matches!(err, squares::Error::InvalidConfig { .. }));
    assert_eq!(doc.node_count(), nodes);
}

#[test]
fn unmount_removes_elements_and_listeners() {
    let doc = setup();
    let nodes = doc.node_count();
    let squares = mount(&doc);
    assert!(doc.with_read(|t| t.total_listener_count()) > 0);

    squares.unmount().unwrap();
    assert_eq!(doc.node_count(), nodes);
    assert_eq!(doc.with_read(|t| t.total_listener_count()), 0);
    let root = Dom::new(&doc, "#grid").unwrap();
    assert_eq!(root.count_children().unwrap(), 0);
}

#[test]
fn config_from_toml_shapes_the_grid() {
    let doc = setup();
    let config = SquaresConfig::from_toml_str("initial_rows = 2\ninitial_columns = 6\n").unwrap();
    let squares = Squares::mount(&doc, "#grid", config).unwrap().unwrap();

    assert_eq!(squares.shape().unwrap(), GridShape { rows: 2, columns: 6 });
    squares.check_invariants().unwrap();
}
