//! Bin for inspecting the layout of list arrays built from JSON.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use logutil::LogFormat;
use serde::Serialize;
use tracing::{debug, info};
use varlist_array::array::{Indexed, ListArray};
use varlist_array::datatype::DataType;
use varlist_array::host::{from_host, slice_to_host, to_host, HostValue};
use varlist_array::index::{IndexExpr, Slice};
use varlist_error::{Result, ResultExt};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// JSON file holding a list of sub-arrays. Reads stdin if omitted.
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Element type of the sub-arrays, e.g. `int64` or `list<float32>`.
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "int64")]
    datatype: DataType,

    /// Index to apply as JSON: an integer, a list of integers, or a list of
    /// booleans.
    #[arg(long, value_name = "JSON", allow_hyphen_values = true, conflicts_with = "slice")]
    index: Option<String>,

    /// Slice to apply, `start:stop[:step]`.
    #[arg(long, value_name = "SLICE", allow_hyphen_values = true)]
    slice: Option<Slice>,

    /// Default log level, overridden by RUST_LOG.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: tracing::Level,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

impl Arguments {
    fn index_expr(&self) -> Result<Option<IndexExpr>> {
        if let Some(slice) = self.slice {
            return Ok(Some(IndexExpr::Slice(slice)));
        }

        match &self.index {
            Some(json) => {
                let value: HostValue =
                    serde_json::from_str(json).context("Failed to parse index as JSON")?;
                Ok(Some(IndexExpr::from_host(&value)?))
            }
            None => Ok(None),
        }
    }
}

/// Raw buffers of an array alongside its logical value.
#[derive(Debug, Serialize)]
struct Layout {
    datatype: String,
    len: usize,
    data: HostValue,
    offsets: Vec<u64>,
    validity: Vec<bool>,
    nbytes: usize,
    value: HostValue,
}

impl Layout {
    fn new(arr: &ListArray) -> Self {
        Layout {
            datatype: arr.datatype().to_string(),
            len: arr.len(),
            data: slice_to_host(&arr.data().slice(0..arr.used_len())),
            offsets: arr.offsets().as_slice().to_vec(),
            validity: arr.validity().iter().collect(),
            nbytes: arr.nbytes(),
            value: to_host(arr),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Output {
    Array(Layout),
    Scalar { value: HostValue },
}

fn run(args: &Arguments, input: &str) -> Result<Output> {
    let value: HostValue = serde_json::from_str(input).context("Failed to parse input as JSON")?;
    let arr = from_host(&value, &args.datatype)?;
    debug!(len = arr.len(), nbytes = arr.nbytes(), "built array");

    let index = match args.index_expr()? {
        Some(index) => index,
        None => return Ok(Output::Array(Layout::new(&arr))),
    };
    info!(?index, "applying index");

    Ok(match arr.get_item(&index)? {
        Indexed::Scalar(values) => Output::Scalar {
            value: slice_to_host(&values),
        },
        Indexed::Array(selected) => Output::Array(Layout::new(&selected)),
    })
}

fn read_input(args: &Arguments) -> Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .context_fn(|| format!("Failed to read input file '{}'", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn inner(args: &Arguments) -> Result<()> {
    let input = read_input(args)?;
    let output = run(args, &input)?;
    let out = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn main() {
    let args = Arguments::parse();

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::HumanReadable
    };
    logutil::configure_global_logger(args.log_level, format);

    if let Err(e) = inner(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use varlist_error::ErrorKind;

    use super::*;

    const SCENARIO_A: &str = "[[1, 2], [3], null, [5, 4, 6], []]";

    fn args(extra: &[&str]) -> Arguments {
        Arguments::try_parse_from(std::iter::once("varlist").chain(extra.iter().copied()))
            .unwrap()
    }

    fn layout(output: Output) -> Layout {
        match output {
            Output::Array(layout) => layout,
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn layout_of_input() {
        let out = layout(run(&args(&[]), SCENARIO_A).unwrap());

        assert_eq!("List[Int64]", out.datatype);
        assert_eq!(5, out.len);
        assert_eq!(vec![0, 2, 3, 3, 6, 6], out.offsets);
        assert_eq!(vec![true, true, false, true, true], out.validity);
        assert_eq!(
            serde_json::from_str::<HostValue>("[1, 2, 3, 5, 4, 6]").unwrap(),
            out.data
        );
        assert_eq!(97, out.nbytes);
    }

    #[test]
    fn scalar_index() {
        let out = run(&args(&["--index", "-2"]), SCENARIO_A).unwrap();
        let value = match out {
            Output::Scalar { value } => value,
            other => panic!("unexpected output: {other:?}"),
        };
        assert_eq!(serde_json::from_str::<HostValue>("[5, 4, 6]").unwrap(), value);
    }

    #[test]
    fn mask_index() {
        let out = layout(
            run(
                &args(&["--index", "[true, false, true, false, true]"]),
                SCENARIO_A,
            )
            .unwrap(),
        );
        assert_eq!(vec![0, 2, 2, 2], out.offsets);
        assert_eq!(vec![true, false, true], out.validity);
    }

    #[test]
    fn slice_arg() {
        let out = layout(run(&args(&["--slice", "-2:"]), SCENARIO_A).unwrap());
        assert_eq!(
            serde_json::from_str::<HostValue>("[[5, 4, 6], []]").unwrap(),
            out.value
        );
    }

    #[test]
    fn slice_with_min_step() {
        let out = layout(run(&args(&["--slice", "::-9223372036854775808"]), SCENARIO_A).unwrap());
        assert_eq!(
            serde_json::from_str::<HostValue>("[[]]").unwrap(),
            out.value
        );
    }

    #[test]
    fn nested_type() {
        let out = layout(run(&args(&["-t", "list<int8>"]), "[[[1], null], [[2, 3]]]").unwrap());
        assert_eq!("List[List[Int8]]", out.datatype);
        assert_eq!(vec![0, 2, 3], out.offsets);
        assert_eq!(
            serde_json::from_str::<HostValue>("[[1], null, [2, 3]]").unwrap(),
            out.data
        );
    }

    #[test]
    fn errors() {
        let err = run(&args(&["--index", "7"]), SCENARIO_A).unwrap_err();
        assert_eq!(ErrorKind::OutOfRange, err.kind());

        let err = run(&args(&["-t", "float64"]), "[[true]]").unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());

        let err = run(&args(&[]), "[[1,").unwrap_err();
        assert_eq!(ErrorKind::Other, err.kind());

        let err = run(&args(&["--index", "1.5"]), SCENARIO_A).unwrap_err();
        assert_eq!(ErrorKind::UnsupportedIndexMode, err.kind());
    }

    #[test]
    fn index_and_slice_conflict() {
        let res = Arguments::try_parse_from(["varlist", "--index", "0", "--slice", "1:"]);
        assert!(res.is_err());
    }
}
