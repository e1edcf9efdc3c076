// src/config/validate.rs

use tracing::warn;

use crate::cli::CliArgs;
use crate::compiler::CompileOptions;
use crate::config::loader::parse_obj;
use crate::config::model::{OptionsObject, RenderConfig};
use crate::errors::RenderError;
use crate::render::{IgnoreRules, OutputOptions};

impl TryFrom<&CliArgs> for RenderConfig {
    type Error = RenderError;

    fn try_from(args: &CliArgs) -> std::result::Result<Self, Self::Error> {
        let obj = match &args.obj {
            Some(input) => parse_obj(input)?,
            None => OptionsObject::default(),
        };

        let line_ending = args.line_ending().or(obj.line_ending);
        let compile = merge_compile_options(args, obj);
        validate_compile_options(args, &compile);

        let output = OutputOptions {
            out_dir: args.out.clone(),
            extension: args.extension.as_deref().map(normalize_extension),
            mode: compile.mode(),
        };

        let ignore = IgnoreRules::new(args.ignore_only_files, &args.exclude)
            .map_err(|err| RenderError::ConfigError(format!("{err:#}")))?;

        let watch = if args.watch && args.dry_run {
            warn!("--watch has no effect with --dry-run; ignoring");
            false
        } else {
            args.watch
        };

        let soft_start = if args.soft_start && !watch {
            warn!("--soft-start has no effect without --watch; ignoring");
            false
        } else {
            args.soft_start
        };

        Ok(RenderConfig {
            compile,
            output,
            ignore,
            watch,
            soft_start,
            line_ending,
            name_after_file: args.name_after_file,
            skip_unchanged: args.skip_unchanged,
            dry_run: args.dry_run,
        })
    }
}

/// CLI flags win over the options object; flags that were not given leave
/// the object's value (or the default) in place.
fn merge_compile_options(args: &CliArgs, obj: OptionsObject) -> CompileOptions {
    let defaults = CompileOptions::default();
    CompileOptions {
        filename: args.path.clone().or(obj.filename),
        basedir: args.basedir.clone().or(obj.basedir),
        pretty: args.pretty || obj.pretty.unwrap_or(defaults.pretty),
        client: args.client || obj.client.unwrap_or(defaults.client),
        compile_debug: if args.no_debug {
            false
        } else {
            obj.compile_debug.unwrap_or(defaults.compile_debug)
        },
        doctype: args.doctype.clone().or(obj.doctype),
        template_name: args.template_name.clone().or(obj.template_name),
        locals: obj.locals,
    }
}

fn validate_compile_options(args: &CliArgs, compile: &CompileOptions) {
    if compile.template_name.is_some() && !compile.client {
        warn!("a template name only applies to client compilation (--client)");
    }
    if args.name_after_file && !compile.client {
        warn!("--name-after-file only applies to client compilation (--client)");
    }
}

/// `--extension .htm` and `--extension htm` mean the same thing.
fn normalize_extension(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_string()
}
