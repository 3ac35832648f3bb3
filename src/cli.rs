use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_OUT_PATH: &str = "nikeplus_workouts.tcx";
pub const DEFAULT_STYLESHEET: &str = "nike+totcx.xsl";
pub const DEFAULT_ENGINE: &str = "saxonb-xslt";

#[derive(Parser, Debug)]
#[command(
    name = "nike2tcx",
    version,
    about = "Merge a directory of Nike+ workout exports into one Garmin TCX file"
)]
pub struct Cli {
    #[arg(short = 'd', long, help = "Path to directory with Nike+ workouts")]
    pub dir: PathBuf,
    #[arg(
        short = 'o',
        long,
        default_value = DEFAULT_OUT_PATH,
        help = "Path to the output TCX file"
    )]
    pub out: PathBuf,
    #[arg(
        long,
        default_value = DEFAULT_STYLESHEET,
        help = "XSLT stylesheet applied to every workout file"
    )]
    pub stylesheet: PathBuf,
    #[arg(
        long,
        default_value = DEFAULT_ENGINE,
        help = "XSLT engine command (Saxon-style -s:/-xsl:/-o: arguments)"
    )]
    pub engine: PathBuf,
    #[arg(
        long,
        help = "Convert every file that succeeds and report failures at the end"
    )]
    pub keep_going: bool,
    #[arg(
        long,
        help = "Stage the output in a temp file and rename it over the target only on full success"
    )]
    pub atomic: bool,
    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,
}
