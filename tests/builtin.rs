use twcascade::{ClassValue, GroupPath, builtin_table, create_cascader, twcx};

fn resolve(classes: &str) -> String {
    create_cascader("")
        .expect("built-in table should load")
        .resolve(classes)
}

#[test]
fn builtin_table_knows_common_utilities() {
    let table = builtin_table().expect("built-in table should load");
    let group = |class: &str| table.group_of(class).map(GroupPath::to_string);

    assert_eq!(group("p-4").as_deref(), Some("spacing.padding.all"));
    assert_eq!(group("-mt-2").as_deref(), Some("spacing.margin.t"));
    assert_eq!(group("rounded-tl-lg").as_deref(), Some("borders.radius.tl"));
    assert_eq!(group("hidden").as_deref(), Some("layout.display"));
    assert_eq!(group("text-opacity-50").as_deref(), Some("typography.text-opacity"));
    assert_eq!(group("w-1/2").as_deref(), Some("sizing.width"));
    assert_eq!(group("text-opactiy-50"), None);
}

#[test]
fn padding_and_margin_follow_side_overrides() {
    assert_eq!(resolve("pt-4 px-2 p-8"), "p-8");
    assert_eq!(resolve("pl-2 pr-2 px-4"), "px-4");
    assert_eq!(resolve("pt-2 px-4"), "pt-2 px-4");
    assert_eq!(resolve("mt-2 -mt-4"), "-mt-4");
    assert_eq!(resolve("mb-4 my-auto m-2 mt-1"), "m-2 mt-1");
}

#[test]
fn radius_corners_are_evicted_by_sides() {
    assert_eq!(resolve("rounded-tl-lg rounded-tr rounded-t"), "rounded-t");
    assert_eq!(resolve("rounded-tl rounded-br rounded"), "rounded");
    assert_eq!(resolve("rounded-bl rounded-t"), "rounded-bl rounded-t");
}

#[test]
fn inset_sides_are_evicted_by_axes() {
    assert_eq!(resolve("top-0 bottom-0 inset-y-auto"), "inset-y-auto");
    assert_eq!(resolve("left-0 inset-0"), "inset-0");
    assert_eq!(resolve("inset-0 left-auto"), "inset-0 left-auto");
}

#[test]
fn unrelated_groups_are_kept() {
    assert_eq!(
        resolve("text-lg text-red-500 text-center text-sm"),
        "text-sm text-red-500 text-center"
    );
    assert_eq!(resolve("block hidden overflow-hidden"), "hidden overflow-hidden");
}

#[test]
fn variants_partition_the_cascade() {
    assert_eq!(resolve("md:p-2 p-4 md:p-8"), "md:p-8 p-4");
    assert_eq!(resolve("hover:pt-2 hover:p-4 pt-2"), "hover:p-4 pt-2");
    assert_eq!(resolve("md:hover:p-2 md:hover:p-4"), "md:hover:p-2 md:hover:p-4");
}

#[test]
fn prefixed_cascader_ignores_bare_classes() {
    let cascader = create_cascader("tw-").expect("built-in table should load");
    assert_eq!(cascader.resolve("p-2 tw-p-2 tw-p-4 p-4"), "p-2 tw-p-4 p-4");
    assert_eq!(cascader.resolve("sm:tw-mt-2 sm:tw-m-0"), "sm:tw-m-0");
}

#[test]
fn twcx_flattens_before_resolving() {
    let open = false;
    assert_eq!(
        twcascade::twcx!("p-4 text-left", ["pt-2", "p-2"], ("hidden", open), None::<&str>),
        "p-2 text-left"
    );
    assert_eq!(
        twcx(&[ClassValue::from("shadow"), ClassValue::from(("shadow-lg", true))]),
        "shadow-lg"
    );
}
