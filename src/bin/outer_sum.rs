use cl_tutorial::{cli::{execute, init_logging, parse_args, OuterSumArgs}, prelude::Result, tutorial::{outer_sum, Session}, utils::list_platforms_devices};

fn main () {
    let args = parse_args::<OuterSumArgs>();
    init_logging();
    execute::<OuterSumArgs>(&args.device.plan(), list_platforms_devices, || run(&args));
}

fn run (args: &OuterSumArgs) -> Result<()> {
    let session = Session::open(args.device.platform, args.device.device)?;
    println!("Running on {}, {}", session.platform_name, session.device_name);

    let program = session.build_program(&args.device.kernels)?;
    let outcome = outer_sum::run(&session, &program)?;
    println!("{}", outcome.summary());
    Ok(())
}
