use splat_expr::{Bindings, Node, ValueType, evaluate, expr};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let splat = Node::composite(
        "splat",
        [
            ("center", ValueType::Vec3),
            ("rgba", ValueType::Vec4),
            ("opacity", ValueType::Float),
        ],
    );
    let time = Node::input("time", ValueType::Float);

    let wobble = expr!(
        "{}.center.y + sin( {} * 2 + {}.center.x ) * 0.1",
        splat.clone(),
        time.clone(),
        splat.clone()
    )?;
    let fade = expr!("{}.opacity * step( 0.5 , fract( {} ) )", splat, time)?;

    let bindings = Bindings::new()
        .bind("time", [0.75])
        .bind("splat.center", [1.0, 2.0, 3.0])
        .bind("splat.opacity", [0.8]);

    for (label, node) in [("wobble", wobble), ("fade", fade)] {
        let value = evaluate(&node, &bindings)?;
        println!("{label}: {node}");
        println!("  = {:?}", value.lanes);
    }

    Ok(())
}
