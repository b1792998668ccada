use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use eyre::WrapErr;
use structopt::StructOpt;

use nc1020_simplify::Partition;

/// 変換後イメージから 1 ページ (BBS は 0x2000 バイトのバンク) を切り出す。
#[derive(Debug, StructOpt)]
struct Opt {
    /// ROM のボリューム番号 (0..3)
    #[structopt(long, default_value = "0")]
    volume: usize,

    #[structopt(parse(try_from_os_str = parse_directory))]
    dir_simplified: PathBuf,

    /// bbs, rom, nor のいずれか
    #[structopt(parse(try_from_str = parse_partition))]
    partition: Partition,

    /// ページ番号 (0x 付きで 16 進)
    #[structopt(parse(try_from_str = parse_number))]
    page: usize,

    #[structopt(parse(from_os_str))]
    path_out: PathBuf,
}

fn parse_directory(s: &std::ffi::OsStr) -> Result<PathBuf, std::ffi::OsString> {
    let dir = PathBuf::from(s);

    dir.is_dir().then(|| dir).ok_or_else(|| s.to_owned())
}

fn parse_partition(s: &str) -> eyre::Result<Partition> {
    Partition::ALL
        .iter()
        .copied()
        .find(|p| p.name() == s)
        .ok_or_else(|| eyre::eyre!("unknown partition: {}", s))
}

fn parse_number(s: &str) -> eyre::Result<usize> {
    let n = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16)?,
        None => s.parse()?,
    };

    Ok(n)
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    let path_in = opt.dir_simplified.join(opt.partition.file_name());
    let file = File::open(&path_in).wrap_err_with(|| format!("cannot open {}", path_in.display()))?;
    eyre::ensure!(
        file.metadata()?.len() == opt.partition.output_len(),
        "{} is not a simplified {:?} image",
        path_in.display(),
        opt.partition
    );

    let buf = opt
        .partition
        .read_page(BufReader::new(file), opt.volume, opt.page)?;
    std::fs::write(opt.path_out, buf)?;

    Ok(())
}
