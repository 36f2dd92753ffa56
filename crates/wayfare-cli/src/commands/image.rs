use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use tracing::warn;
use wayfare_core::dto::ImageResultDto;
use wayfare_core::image::policy::MAX_DIMENSION;
use wayfare_core::image::{ImageTransformRequest, Policy};

#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    /// Insert transformation directives into a CDN url
    Optimize(OptimizeArgs),
    /// Apply one of the named presets
    Preset(PresetArgs),
}

#[derive(Debug, Args)]
pub struct OptimizeArgs {
    pub url: String,
    #[arg(long)]
    pub width: Option<String>,
    #[arg(long)]
    pub height: Option<String>,
    #[arg(long, default_value = "auto")]
    pub quality: String,
    #[arg(long, default_value = "auto")]
    pub format: String,
    #[arg(long, default_value = "limit", conflicts_with = "no_crop")]
    pub crop: String,
    /// Leave out the crop directive
    #[arg(long)]
    pub no_crop: bool,
    /// Add a blur for low-quality placeholders
    #[arg(long)]
    pub lazy: bool,
}

#[derive(Debug, Args)]
pub struct PresetArgs {
    #[arg(value_enum)]
    pub policy: PolicyArg,
    pub url: String,
    /// Width for gallery and quick, edge length for avatar
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION as i64))]
    pub size: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicyArg {
    Thumbnail,
    Gallery,
    Fullscreen,
    Avatar,
    Quick,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Thumbnail => Policy::Thumbnail,
            PolicyArg::Gallery => Policy::Gallery,
            PolicyArg::Fullscreen => Policy::Fullscreen,
            PolicyArg::Avatar => Policy::Avatar,
            PolicyArg::Quick => Policy::Quick,
        }
    }
}

pub fn optimize(ctx: &Context<'_>, args: OptimizeArgs) -> Result<()> {
    let mut request = ImageTransformRequest::default()
        .with_quality(args.quality)
        .with_format(args.format)
        .with_crop_mode(args.crop)
        .with_lazy_placeholder(args.lazy);
    request.width = args.width;
    request.height = args.height;
    if args.no_crop {
        request = request.without_crop();
    }

    let outcome = ctx.optimizer.transform(&args.url, &request);
    if let Err(reason) = &outcome {
        if reason.is_warning() {
            warn!(url = %args.url, error = %reason, "image url left unoptimized");
        }
    }
    let dto = ImageResultDto::from_outcome(&args.url, outcome);
    print_result(ctx, &dto)
}

pub fn preset(ctx: &Context<'_>, args: PresetArgs) -> Result<()> {
    let policy: Policy = args.policy.into();
    let url = ctx.optimizer.apply(policy, &args.url, args.size);
    let dto = ImageResultDto::from_rewrite(&args.url, url);
    print_result(ctx, &dto)
}

fn print_result(ctx: &Context<'_>, dto: &ImageResultDto) -> Result<()> {
    if ctx.json {
        print_json(dto)?;
    } else {
        println!("{}", dto.url);
    }
    Ok(())
}
