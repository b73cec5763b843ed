mod common;

use common::{lock, Bus};
use dc1394::{Camera, Error, Guid, Result};

#[test]
fn sessions_share_one_driver_handle() -> Result<()> {
    common::init_logging();
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);
    assert!(!ctx.is_connected());

    let sessions = (0..3)
        .map(|_| Camera::new(&ctx))
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(ctx.refs(), 3);
    assert!(ctx.is_connected());
    assert_eq!(lock(&bus).created, 1);

    drop(sessions);
    assert_eq!(ctx.refs(), 0);
    assert!(!ctx.is_connected());
    {
        let bus = lock(&bus);
        assert_eq!(bus.created, 1);
        assert_eq!(bus.destroyed, 1);
    }

    // a later session starts a fresh handle
    let camera = Camera::new(&ctx)?;
    assert_eq!(lock(&bus).created, 2);
    drop(camera);
    assert_eq!(lock(&bus).destroyed, 2);
    Ok(())
}

#[test]
fn open_sessions_release_device_before_driver() -> Result<()> {
    let bus = Bus::mono_camera();
    lock(&bus).guids.push(Guid(0x00b0_9d01_00a0_1a9b));
    let ctx = common::context(&bus);

    let mut first = Camera::new(&ctx)?;
    let mut second = Camera::new(&ctx)?;
    first.open(0usize)?;
    second.open(1usize)?;
    assert!(first.ready() && second.ready());

    drop(first);
    assert_eq!(lock(&bus).destroyed, 0);
    drop(second);

    let bus = lock(&bus);
    assert_eq!(bus.destroyed, 1);
    assert!(!bus.capturing);
    assert!(!bus.transmission);
    assert_eq!(ctx.refs(), 0);
    Ok(())
}

#[test]
fn failed_connect_takes_no_reference() {
    let bus = Bus::mono_camera();
    lock(&bus).fail_connect = true;
    let ctx = common::context(&bus);

    assert!(matches!(Camera::new(&ctx), Err(Error::ContextCreation)));
    assert_eq!(ctx.refs(), 0);
    assert!(!ctx.is_connected());

    lock(&bus).fail_connect = false;
    assert!(Camera::new(&ctx).is_ok());
    assert_eq!(lock(&bus).created, 1);
}

#[test]
fn lease_enumerates_the_bus() -> Result<()> {
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);

    let lease = ctx.acquire()?;
    let guids: Vec<_> = lease.devices()?.collect();
    assert_eq!(guids, vec![common::GUID]);

    let camera = Camera::new(&ctx)?;
    assert_eq!(camera.camera_count()?, 1);
    assert_eq!(ctx.refs(), 2);
    Ok(())
}

#[test]
fn camera_is_held_by_one_session_at_a_time() -> Result<()> {
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);

    let mut first = Camera::new(&ctx)?;
    let mut second = Camera::new(&ctx)?;
    first.open(0usize)?;
    assert!(ctx.is_held(common::GUID));

    assert!(matches!(
        second.open(common::GUID),
        Err(Error::DeviceBusy(guid)) if guid == common::GUID
    ));
    assert!(!second.ready());
    assert!(first.ready());

    // reopening the same camera from the holding session is fine
    first.open(0usize)?;
    assert!(first.ready());

    first.close();
    assert!(!ctx.is_held(common::GUID));
    second.open(0usize)?;
    assert!(second.ready());

    drop(second);
    assert!(!ctx.is_held(common::GUID));
    first.open(common::GUID)?;
    assert!(first.ready());
    Ok(())
}
