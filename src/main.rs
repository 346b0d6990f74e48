use std::{
	env,
	path::PathBuf,
	process::ExitCode,
	time::Instant,
};

use orthomap::{
	MapResult,
	render::{
		map::render_map,
		palette::BlockPalette,
	},
};

fn main() -> ExitCode {
	env_logger::init();

	let mut args = env::args().skip(1);
	let Some(region_dir) = args.next() else {
		eprintln!("usage: orthomap <region-dir> [output.png] [palette.toml]");
		return ExitCode::FAILURE;
	};
	let output = args.next().unwrap_or_else(|| "map.png".to_owned());
	let palette_file = args.next();

	match run(region_dir.into(), output.into(), palette_file.map(PathBuf::from)) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("orthomap: {err}");
			ExitCode::FAILURE
		}
	}
}

fn run(region_dir: PathBuf, output: PathBuf, palette_file: Option<PathBuf>) -> MapResult<()> {
	let mut palette = BlockPalette::builtin();
	if let Some(path) = palette_file {
		palette.load_overrides(path)?;
	}

	let started = Instant::now();
	let image = render_map(&region_dir, &palette)?;
	image.save(&output)?;
	println!("Time taken: {:?}", started.elapsed());
	Ok(())
}
