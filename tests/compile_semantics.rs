use splat_expr::{
    Arg, BinaryOp, Bindings, CompileOptions, Compiler, ExprError, Graph, Node, NodeLibrary,
    ValueType, compile, evaluate, expr,
};

fn eval_scalar(node: &Node, bindings: &Bindings) -> f64 {
    evaluate(node, bindings).unwrap().scalar().unwrap()
}

#[test]
fn precedence_matches_explicit_grouping() {
    let implicit = expr!("2 + 3 * 4").unwrap();
    let grouped = expr!("2 + ( 3 * 4 )").unwrap();
    let wrong = expr!("( 2 + 3 ) * 4").unwrap();

    assert_eq!(implicit, grouped);
    assert_ne!(implicit, wrong);
    assert_eq!(eval_scalar(&implicit, &Bindings::new()), 14.0);
    assert_eq!(eval_scalar(&wrong, &Bindings::new()), 20.0);
}

#[test]
fn parentheses_group_interpolated_values() {
    let a = Node::input("a", ValueType::Float);
    let b = Node::input("b", ValueType::Float);
    let n = expr!("( {} + {} ) * 2", a, b).unwrap();
    let env = Bindings::new().bind("a", [1.0]).bind("b", [2.0]);
    assert_eq!(eval_scalar(&n, &env), 6.0);
}

#[test]
fn property_access_binds_tighter_than_arithmetic() {
    let v = Node::input("v", ValueType::Vec3);
    let n = expr!("{}.x + 1", v.clone()).unwrap();

    let x = Graph.component(&v, "x").unwrap();
    assert_eq!(n, Graph.binary(BinaryOp::Add, x, Node::float(1.0)));

    let env = Bindings::new().bind("v", [4.0, 5.0, 6.0]);
    assert_eq!(eval_scalar(&n, &env), 5.0);
}

#[test]
fn segments_and_values_interleave_like_a_tagged_template() {
    let pos = Node::input("pos", ValueType::Vec3);
    let n = compile(
        &["", ".y * ", " + ", ""],
        vec![Arg::Node(pos), Arg::Number(2.0), Arg::Number(0.5)],
    )
    .unwrap();
    assert_eq!(n.to_string(), "add(mul(pos.y, 2), 0.5)");
}

#[test]
fn positional_placeholders_can_be_reused_in_text() {
    let t = Node::input("t", ValueType::Float);
    let n = expr!("{} * $0", t).unwrap();
    assert_eq!(n.to_string(), "mul(t, t)");
}

#[test]
fn digit_typed_after_a_hole_is_an_invalid_token() {
    let a = Node::input("a", ValueType::Float);
    let b = Node::input("b", ValueType::Float);

    match expr!("{}0", a.clone()) {
        Err(ExprError::InvalidToken { lexeme }) => assert_eq!(lexeme, "${0}0"),
        other => panic!("unexpected result: {other:?}"),
    }
    match expr!("{}1 + {}", a, b) {
        Err(ExprError::InvalidToken { lexeme }) => assert_eq!(lexeme, "${0}1"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn vectors_flow_through_functions() {
    let c = Node::input("c", ValueType::Vec3);
    let n = expr!("mix( {} , {} , 0.5 )", c, Node::vec3([1.0, 1.0, 1.0])).unwrap();
    assert_eq!(n.ty(), Some(ValueType::Vec3));

    let env = Bindings::new().bind("c", [0.0, 2.0, 4.0]);
    let out = evaluate(&n, &env).unwrap();
    assert_eq!(out.lanes, vec![0.5, 1.5, 2.5]);
}

#[test]
fn modulo_and_nested_calls_compose() {
    let x = Node::input("x", ValueType::Float);
    let y = Node::input("y", ValueType::Float);
    let env = Bindings::new().bind("x", [7.0]).bind("y", [3.0]);

    let m = expr!("{} % {}", x.clone(), y).unwrap();
    assert_eq!(eval_scalar(&m, &env), 1.0);

    let sc = expr!("sin(cos({}))", x).unwrap();
    assert_eq!(sc.to_string(), "sin(cos(x))");
    assert!((eval_scalar(&sc, &env) - 7.0f64.cos().sin()).abs() < 1e-12);
}

#[test]
fn pi_and_sqrt_evaluate() {
    let n = expr!("sqrt( PI * PI ) - PI").unwrap();
    assert!(eval_scalar(&n, &Bindings::new()).abs() < 1e-12);
}

#[test]
fn unknown_function_and_operator_are_rejected() {
    let x = Node::input("x", ValueType::Float);
    let y = Node::input("y", ValueType::Float);

    match expr!("invalidFunc({})", x.clone()) {
        Err(ExprError::InvalidToken { lexeme }) => assert_eq!(lexeme, "invalidFunc"),
        other => panic!("unexpected result: {other:?}"),
    }
    match expr!("{} ^ {}", x, y) {
        Err(ExprError::InvalidToken { lexeme }) => assert_eq!(lexeme, "^"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn fourth_call_argument_does_not_silently_succeed() {
    let err = expr!("mix( 1 , 2 , 3 , 4 )").unwrap_err();
    assert!(matches!(err, ExprError::UnclosedParenthesis { ref found } if found == "','"));
    assert!(err.to_string().contains("expected ')'"));
}

#[test]
fn arity_is_checked_per_function() {
    assert!(expr!("pow( 2 , 3 )").is_ok());
    assert!(matches!(
        expr!("pow( 2 )"),
        Err(ExprError::Arity {
            function: "pow",
            expected: 2,
            found: 1
        })
    ));
}

#[test]
fn malformed_interpolations_are_rejected() {
    let short = Node::constant(ValueType::Vec4, vec![1.0, 2.0]);
    assert!(matches!(
        expr!("1 + {}", short),
        Err(ExprError::InvalidInterpolatedValue { index: 0, .. })
    ));
}

#[test]
fn composite_channels_are_reachable() {
    let splat = Node::composite(
        "splat",
        [("center", ValueType::Vec3), ("opacity", ValueType::Float)],
    );
    let n = expr!("{}.opacity * {}.center.z", splat.clone(), splat.clone()).unwrap();
    let env = Bindings::new()
        .bind("splat.opacity", [0.5])
        .bind("splat.center", [0.0, 0.0, 8.0]);
    assert_eq!(eval_scalar(&n, &env), 4.0);

    assert!(matches!(
        expr!("{}.scales", splat),
        Err(ExprError::InvalidPropertyAccess { property, .. }) if property == "scales"
    ));
}

#[test]
fn depth_limit_comes_from_options() {
    let opts = CompileOptions::from_json_str(r#"{ "max_depth": 4 }"#).unwrap();
    let compiler = Compiler::new(Graph).with_options(opts);
    assert!(compiler.compile_template("sin( ( 1 ) )", vec![]).is_ok());
    assert!(matches!(
        compiler.compile_template("sin( sin( sin( sin( 1 ) ) ) )", vec![]),
        Err(ExprError::NestingTooDeep { limit: 4 })
    ));
}

#[test]
fn compiler_is_shareable_across_threads() {
    let compiler = Compiler::new(Graph);
    std::thread::scope(|s| {
        for i in 0..4 {
            let compiler = &compiler;
            s.spawn(move || {
                let n = compiler
                    .compile_template("{} * 2", vec![Arg::Number(f64::from(i))])
                    .unwrap();
                assert_eq!(eval_scalar(&n, &Bindings::new()), f64::from(i) * 2.0);
            });
        }
    });
}
