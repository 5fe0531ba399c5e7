use cl_tutorial::{prelude::*, tutorial::{multadd, outer_sum, Session}, utils::{get_context, get_device, list_platforms_devices}};

const TEST_KERNEL : &'static str = "void kernel add (const int n, __global const int* rhs, __global const int* in, __global int* out) {
    for (int id = get_global_id(0); id<n; id += get_global_size(0)) {
        out[id] = in[id] + rhs[id];
    }
}";

const KERNELS : &'static str = concat!(env!("CARGO_MANIFEST_DIR"), "/kernels/kernels.cl");

#[test]
#[ignore = "requires an OpenCL device"]
fn sum () {
    let device = get_device(0, 0).unwrap();
    let ctx = get_context(0, 0).unwrap();
    let queue = CommandQueue::new(&ctx, &device, CommandQueueProps::PROFILING_ENABLE).unwrap();

    let mut left = MemBuffer::<i32>::new(&ctx, MemFlags::READ_ONLY, 5).unwrap();
    let mut right = MemBuffer::<i32>::new(&ctx, MemFlags::READ_ONLY, 5).unwrap();
    let result = MemBuffer::<i32>::new(&ctx, MemFlags::WRITE_ONLY, 5).unwrap();
    left.write(&queue, true, 0, &[1, 2, 3, 4, 5], EMPTY).unwrap();
    right.write(&queue, true, 0, &[6, 7, 8, 9, 10], EMPTY).unwrap();

    let program = Program::from_source(&ctx, TEST_KERNEL).unwrap();
    program.build(&[device], "").unwrap();
    assert_eq!(program.build_status(&device).unwrap(), BuildStatus::Success);

    let mut kernel = Kernel::new(&program, "add").unwrap();
    assert_eq!(kernel.num_args().unwrap(), 4);
    kernel.set_arg(0, 5i32).unwrap();
    kernel.set_mem_arg(1, &right).unwrap();
    kernel.set_mem_arg(2, &left).unwrap();
    kernel.set_mem_arg(3, &result).unwrap();

    let sum = kernel.enqueue_with_queue(&queue, &[5], None, EMPTY).unwrap();
    let mut out = [0; 5];
    result.read(&queue, false, 0, &mut out, [&sum]).unwrap().wait().unwrap();

    assert_eq!(out, [7, 9, 11, 13, 15]);
}

#[test]
#[ignore = "requires an OpenCL device"]
fn listing_names_first_device () {
    let listing = list_platforms_devices().unwrap();
    let name = get_device(0, 0).unwrap().name().unwrap();

    assert!(listing.contains("Platform 0, "));
    assert!(listing.contains(&format!("Device 0, {name}, ")));
}

#[test]
#[ignore = "requires an OpenCL device"]
fn out_of_range_device () {
    let report = Session::open(0, usize::MAX).err().unwrap();
    assert_eq!(*report.current_context(), ErrorCL::InvalidDevice);
}

#[test]
#[ignore = "requires an OpenCL device"]
fn broken_kernel_fails_to_build () {
    let session = Session::open(0, 0).unwrap();
    let path = std::env::temp_dir().join(format!("cl-tutorial-broken-{}.cl", std::process::id()));
    std::fs::write(&path, "__kernel void broken(__global int* A) { A[0] = ; }").unwrap();

    let report = session.build_program(&path).err().unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(*report.current_context(), ErrorCL::BuildProgramFailure);
}

#[test]
#[ignore = "requires an OpenCL device"]
fn multadd_matches_host () {
    let session = Session::open(0, 0).unwrap();
    let program = session.build_program(KERNELS).unwrap();

    for size in [1, 128, 10_000] {
        let outcome = multadd::run(&session, &program, size).unwrap();
        assert_eq!(outcome.c.len(), size);
        assert_eq!(outcome.c, multadd::multadd_host(&outcome.a, &outcome.b));
        let transfers = outcome.transfers.iter().map(|t| t.ended - t.started).sum::<u64>();
        assert_eq!(outcome.overall_time(), transfers);
    }
}

#[test]
#[ignore = "requires an OpenCL device"]
fn multadd_rejects_empty_vectors () {
    let session = Session::open(0, 0).unwrap();
    let program = session.build_program(KERNELS).unwrap();

    let report = multadd::run(&session, &program, 0).err().unwrap();
    assert_eq!(*report.current_context(), ErrorCL::InvalidBufferSize);
}

#[test]
#[ignore = "requires an OpenCL device"]
fn outer_sum_matches_kernel_formula () {
    let session = Session::open(0, 0).unwrap();
    let program = session.build_program(KERNELS).unwrap();

    let outcome = outer_sum::run(&session, &program).unwrap();
    assert_eq!(outcome.c, [7, 8, 9, 10, 11, 8, 9, 10, 11, 12]);
}

#[test]
fn platform_enumeration_never_panics () {
    // no ICD installed is an empty list, not an error
    if let Ok(platforms) = Platform::all() {
        for platform in platforms {
            assert!(platform.devices().is_ok());
        }
    }
}
