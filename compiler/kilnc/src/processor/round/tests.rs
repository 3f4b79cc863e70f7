use pretty_assertions::assert_eq;

use super::*;

const SOURCE: &str = "\
package com.example;

@Builder
public class Point {
    @Getter private int x;
    private int y;

    public Point(@NonNull Integer x, int y) {}

    @Deprecated
    void move(int dx) {}

    enum Axis { @Primary X, Y }

    static class Inner {
        @Getter String label;
    }
}
";

fn with_round<R>(f: impl FnOnce(&RoundEnv<'_>) -> R) -> R {
    let source = SourceUnit::new("com/example/Point.java", SOURCE);
    let tree = kiln_parse::parse(source.text()).unwrap();
    let round = RoundEnv::new(
        vec![RootUnit {
            source: &source,
            tree: &tree,
        }],
        1,
        false,
        false,
    );
    f(&round)
}

#[test]
fn elements_come_in_source_order() {
    let listed = with_round(|round| {
        round
            .elements()
            .iter()
            .map(|e| (e.kind(), e.qualified_name()))
            .collect::<Vec<_>>()
    });
    assert_eq!(
        listed,
        vec![
            (ElementKind::Class, "com.example.Point".to_string()),
            (ElementKind::Field, "com.example.Point.x".to_string()),
            (ElementKind::Field, "com.example.Point.y".to_string()),
            (ElementKind::Constructor, "com.example.Point.Point".to_string()),
            (ElementKind::Parameter, "com.example.Point.x".to_string()),
            (ElementKind::Parameter, "com.example.Point.y".to_string()),
            (ElementKind::Method, "com.example.Point.move".to_string()),
            (ElementKind::Parameter, "com.example.Point.dx".to_string()),
            (ElementKind::Enum, "com.example.Point.Axis".to_string()),
            (ElementKind::EnumConstant, "com.example.Point.Axis.X".to_string()),
            (ElementKind::EnumConstant, "com.example.Point.Axis.Y".to_string()),
            (ElementKind::Class, "com.example.Point.Inner".to_string()),
            (ElementKind::Field, "com.example.Point.Inner.label".to_string()),
        ]
    );
}

#[test]
fn annotated_elements_across_nesting() {
    let getters = with_round(|round| {
        round
            .elements_annotated_with("Getter")
            .iter()
            .map(|e| (e.simple_name().to_string(), e.owner().to_string()))
            .collect::<Vec<_>>()
    });
    assert_eq!(
        getters,
        vec![
            ("x".to_string(), "com.example.Point".to_string()),
            ("label".to_string(), "com.example.Point.Inner".to_string()),
        ]
    );
}

#[test]
fn annotation_presence_and_names() {
    with_round(|round| {
        assert!(round.is_annotation_present("Builder"));
        assert!(round.is_annotation_present("Primary"));
        assert!(round.is_annotation_present("java.lang.Deprecated"));
        assert!(!round.is_annotation_present("Value"));
        assert_eq!(
            round.annotations_present(),
            vec!["Builder", "Getter", "NonNull", "Deprecated", "Primary"]
        );
    });
}

#[test]
fn root_elements_are_top_level_types() {
    with_round(|round| {
        let roots = round.root_elements();
        assert_eq!(roots.len(), 1);
        let point = &roots[0];
        assert_eq!(point.simple_name(), "Point");
        assert!(point.modifiers().contains(ModifierSet::PUBLIC));
        assert!(point.annotation("Builder").is_some());
        assert_eq!(point.type_decl().map(|t| t.members.len()), Some(6));
        assert!(point.method_decl().is_none());
        assert_eq!(point.unit().name(), "com/example/Point.java");
    });
}

#[test]
fn member_accessors() {
    with_round(|round| {
        let elements = round.elements();
        let field = &elements[1];
        assert_eq!(field.field_decl().map(|f| f.declarators.len()), Some(1));
        assert!(field.modifiers().contains(ModifierSet::PRIVATE));

        let method = round
            .elements()
            .into_iter()
            .find(|e| e.kind() == ElementKind::Method)
            .unwrap();
        assert_eq!(method.method_decl().map(|m| m.params.len()), Some(1));
        assert!(matches!(method.node(), NodeRef::Method(_)));
        assert_eq!(&SOURCE[method.span().start as usize..method.span().end as usize], "move");
    });
}

#[test]
fn round_flags() {
    let source = SourceUnit::new("A.java", "class A {}");
    let tree = kiln_parse::parse(source.text()).unwrap();
    let first = RoundEnv::new(vec![RootUnit { source: &source, tree: &tree }], 1, false, true);
    assert_eq!(first.round_number(), 1);
    assert!(first.error_raised());
    assert!(!first.processing_over());
    assert_eq!(first.roots().len(), 1);

    let last = RoundEnv::new(Vec::new(), 3, true, false);
    assert!(last.processing_over());
    assert!(last.elements().is_empty());
}
