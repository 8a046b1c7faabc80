extern crate procsugar;

use std::process;

use procsugar::driver::options::ProcsugarOptions;
use procsugar::driver::prepare;
use procsugar::driver::source::SourceLoader;
use procsugar::driver::statistics::Statistics;

pub fn main() {
    let opt = ProcsugarOptions::from_args();
    let mut loader = SourceLoader::new();
    let mut statistics = Statistics::default();

    // Problems in the tree are reported and the desugared tree is
    // still written; anything else stops the run
    match prepare::run(&opt, &mut loader, &mut statistics) {
        Err(e) => {
            let diag = loader.error_diagnostic(&e);
            loader.diagnose_to_stderr(&diag);
            exit(&opt, 2, &statistics);
        }
        Ok(outcome) => {
            for diag in &outcome.diagnostics {
                loader.diagnose_to_stderr(diag);
            }
            exit(&opt, outcome.exit_code(), &statistics);
        }
    }
}

/// Optionally dump stats to stderr then exit
pub fn exit(opts: &ProcsugarOptions, code: i32, stats: &Statistics) {
    if opts.statistics {
        eprintln!();
        eprintln!("~~~~~~~~~~");
        eprintln!("STATISTICS");
        eprintln!("~~~~~~~~~~");
        eprintln!();
        eprintln!("{stats}");
    }
    process::exit(code)
}
