use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use splat_expr::{Arg, Bindings, CompileOptions, Compiler, Graph, Node, ValueType};

#[derive(Parser, Debug)]
#[command(name = "splat-expr", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile an expression and print the resulting node.
    Graph(CompileArgs),
    /// Compile an expression, evaluate it, and print the value as JSON.
    Eval(EvalArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Expression template; each `{}` takes the next `--arg`.
    template: String,

    /// Interpolated value: `2.5`, `vec3:1,2,3`, `input:NAME:TYPE` or
    /// `composite:NAME:CHANNEL=TYPE,...`.
    #[arg(long = "arg", value_parser = parse_arg, allow_hyphen_values = true)]
    args: Vec<Arg<Node>>,

    /// Compile options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    #[command(flatten)]
    compile: CompileArgs,

    /// Input value `NAME=V,V,...`; composite outputs bind as `NAME.CHANNEL=...`.
    #[arg(long = "bind", value_parser = parse_binding)]
    bind: Vec<(String, Vec<f64>)>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Graph(args) => cmd_graph(args),
        Command::Eval(args) => cmd_eval(args),
    }
}

fn cmd_graph(args: CompileArgs) -> anyhow::Result<()> {
    let node = compile(args)?;
    println!("{node}");
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let node = compile(args.compile)?;
    let mut bindings = Bindings::new();
    for (name, lanes) in args.bind {
        bindings.insert(name, lanes);
    }
    let value =
        splat_expr::evaluate(&node, &bindings).with_context(|| format!("evaluate '{node}'"))?;
    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}

fn compile(args: CompileArgs) -> anyhow::Result<Node> {
    let compiler = make_compiler(args.config.as_deref())?;
    let node = compiler
        .compile_template(&args.template, args.args)
        .with_context(|| format!("compile '{}'", args.template))?;
    Ok(node)
}

fn make_compiler(config: Option<&Path>) -> anyhow::Result<Compiler<Graph>> {
    let opts = match config {
        Some(path) => CompileOptions::from_path(path)?,
        None => CompileOptions::default(),
    };
    Ok(Compiler::new(Graph).with_options(opts))
}

fn parse_arg(s: &str) -> Result<Arg<Node>, String> {
    if let Ok(v) = s.parse::<f64>() {
        return Ok(Arg::Number(v));
    }

    let (kind, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("expected a number or KIND:..., got '{s}'"))?;
    let node = match kind {
        "input" => {
            let (name, ty) = rest
                .split_once(':')
                .ok_or_else(|| format!("expected input:NAME:TYPE, got '{s}'"))?;
            Node::input(name, parse_type(ty)?)
        }
        "composite" => {
            let (name, channels) = rest
                .split_once(':')
                .ok_or_else(|| format!("expected composite:NAME:CHANNEL=TYPE,..., got '{s}'"))?;
            let outputs = channels
                .split(',')
                .filter(|c| !c.is_empty())
                .map(|c| {
                    let (channel, ty) = c
                        .split_once('=')
                        .ok_or_else(|| format!("expected CHANNEL=TYPE, got '{c}'"))?;
                    Ok((channel.to_owned(), parse_type(ty)?))
                })
                .collect::<Result<Vec<_>, String>>()?;
            Node::composite(name, outputs)
        }
        // Lane count is left to the compiler's validation.
        ty => Node::constant(parse_type(ty)?, parse_lanes(rest)?),
    };
    Ok(Arg::Node(node))
}

fn parse_binding(s: &str) -> Result<(String, Vec<f64>), String> {
    let (name, lanes) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=V,..., got '{s}'"))?;
    Ok((name.to_owned(), parse_lanes(lanes)?))
}

fn parse_type(s: &str) -> Result<ValueType, String> {
    ValueType::parse(s).ok_or_else(|| format!("unknown type '{s}' (float, vec2, vec3, vec4)"))
}

fn parse_lanes(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid lane '{v}': {e}"))
        })
        .collect()
}
