use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use structopt::StructOpt;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use nc1020_simplify::{Partition, SourceImage, ROM_IMAGE_LEN};

/// 公式シミュレータ形式のイメージから bbs.bin, rom.bin, nor.bin を生成する。
#[derive(Debug, StructOpt)]
struct Opt {
    /// -v: info, -vv: debug
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// シミュレータの ROM イメージ (通常は obj_lu.bin)
    #[structopt(parse(from_os_str))]
    path_rom: PathBuf,

    /// シミュレータの NOR フラッシュイメージ (通常は nc1020.fls)
    #[structopt(parse(from_os_str))]
    path_nor: PathBuf,

    #[structopt(parse(from_os_str))]
    dir_out: PathBuf,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok();
}

fn open_source(path: &Path) -> eyre::Result<BufReader<File>> {
    let file = File::open(path).wrap_err_with(|| format!("cannot open {}", path.display()))?;

    Ok(BufReader::new(file))
}

fn dump<R: std::io::Read + std::io::Seek>(
    partition: Partition,
    src: R,
    dir_out: &Path,
) -> eyre::Result<()> {
    let path_out = dir_out.join(partition.file_name());

    let file = File::create(&path_out)
        .wrap_err_with(|| format!("cannot create {}", path_out.display()))?;
    let mut wtr = BufWriter::new(file);

    let len = partition
        .extract(src, &mut wtr)
        .wrap_err_with(|| format!("{:?} extraction failed", partition))?;
    wtr.flush()?;

    info!("wrote {} ({:#x} bytes)", path_out.display(), len);

    Ok(())
}

/// ROM イメージ由来の bbs.bin, rom.bin を書いてから NOR イメージを開く。
fn simplify(path_rom: &Path, path_nor: &Path, dir_out: &Path) -> eyre::Result<()> {
    std::fs::create_dir_all(dir_out)
        .wrap_err_with(|| format!("cannot create {}", dir_out.display()))?;

    {
        let mut rdr = open_source(path_rom)?;

        let rom_len = rdr.get_ref().metadata()?.len();
        if rom_len != ROM_IMAGE_LEN {
            warn!(
                "{} is {:#x} bytes (expected {:#x})",
                path_rom.display(),
                rom_len,
                ROM_IMAGE_LEN
            );
        }

        for &partition in Partition::ALL
            .iter()
            .filter(|p| p.source() == SourceImage::Rom)
        {
            dump(partition, &mut rdr, dir_out)?;
        }
    }
    {
        let mut rdr = open_source(path_nor)?;
        for &partition in Partition::ALL
            .iter()
            .filter(|p| p.source() == SourceImage::Nor)
        {
            dump(partition, &mut rdr, dir_out)?;
        }
    }

    Ok(())
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    setup_logging(opt.verbose);

    simplify(&opt.path_rom, &opt.path_nor, &opt.dir_out)
}
