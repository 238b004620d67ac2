use dataview::{ConfigNode, ConfigTranslator, DataError, DataValue, DataView, TreeNode};
use once_cell::sync::Lazy;

static TRANSLATOR: Lazy<ConfigTranslator> = Lazy::new(ConfigTranslator::default);

static PLAYER: Lazy<DataView> = Lazy::new(|| {
    let mut stats = DataView::new();
    stats.set("health", 20).unwrap();
    stats.set("speed", 0.1f32).unwrap();

    let mut view = DataView::new();
    view.set("name", "steve").unwrap();
    view.set("flags.op", true).unwrap();
    view.set("flags.level", 4i8).unwrap();
    view.set("stats", stats.clone()).unwrap();
    view.set("history", vec![1i64, 2, 3]).unwrap();
    view.set("snapshots", vec![DataValue::View(stats.clone()), DataValue::View(stats)])
        .unwrap();
    view
});

#[test]
fn round_trip_through_nodes_preserves_view() {
    let node: ConfigNode = TRANSLATOR.serialize(&PLAYER).unwrap();
    assert_eq!(TRANSLATOR.deserialize(&node).unwrap(), *PLAYER);
}

#[test]
fn round_trip_through_xml_preserves_scalar_kinds() {
    let node: ConfigNode = TRANSLATOR.serialize(&PLAYER).unwrap();
    let reparsed = ConfigNode::from_xml(&node.to_xml()).unwrap();
    let view = TRANSLATOR.deserialize(&reparsed).unwrap();

    assert_eq!(view, *PLAYER);
    assert_eq!(view.get_byte("flags.level"), Some(4));
    assert_eq!(view.get_float("stats.speed"), Some(0.1));
    assert_eq!(view.get_long_list("history"), Some(vec![1, 2, 3]));
}

#[test]
fn marker_is_transparent_to_readers() {
    let node: ConfigNode = TRANSLATOR.serialize(&PLAYER).unwrap();
    let view = TRANSLATOR.deserialize(&node).unwrap();
    let stats = view.get_view("stats").unwrap();
    assert_eq!(stats.len(), 2);
    assert!(stats
        .keys(false)
        .iter()
        .all(|query| query.last() != Some(dataview::translator::DEFAULT_MARKER)));
    assert_eq!(view.get_views("snapshots").map(|views| views.len()), Some(2));
}

#[test]
fn plain_maps_and_views_are_distinguished() {
    let node: ConfigNode = TRANSLATOR.serialize(&PLAYER).unwrap();
    let view = TRANSLATOR.deserialize(&node).unwrap();
    assert!(matches!(view.get("flags"), Some(DataValue::Map(_))));
    assert!(matches!(view.get("stats"), Some(DataValue::View(_))));
}

#[test]
fn translation_errors_surface_as_anyhow_context() {
    let node = ConfigNode::from_xml(
        r#"<map><value key="a" type="int">1</value><map key="a"><value key="b" type="int">2</value></map></map>"#,
    )
    .unwrap();
    // The second "a" replaces the first, so the document is well formed.
    assert_eq!(TRANSLATOR.deserialize(&node).unwrap().get_int("a.b"), Some(2));

    let mut view = DataView::new();
    view.set("a", 1).unwrap();
    let err = TRANSLATOR.merge(&node, &mut view).unwrap_err();
    assert!(matches!(err, DataError::InvalidData { .. }));
    let wrapped = anyhow::Error::new(err).context("merge failed");
    assert!(format!("{wrapped:?}").contains("invalid data at 'a.b'"));
}

#[test]
fn merge_into_existing_view_keeps_other_entries() {
    let node = ConfigNode::from_xml(r#"<value key="flags.op" type="bool">false</value>"#).unwrap();
    // A root element carries no key, so the node merges at the fallback path.
    let mut view = PLAYER.copy();
    TRANSLATOR.merge(&node, &mut view).unwrap();
    assert_eq!(view.get_bool("value"), Some(false));
    assert_eq!(view.get_bool("flags.op"), Some(true));

    let mut keyed = ConfigNode::root();
    keyed.child_mut("flags.op").set_value(false.into());
    TRANSLATOR
        .merge(keyed.child("flags.op").unwrap(), &mut view)
        .unwrap();
    assert_eq!(view.get_bool("flags.op"), Some(false));
}
