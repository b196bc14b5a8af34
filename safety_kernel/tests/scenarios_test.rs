//! End-to-end scenarios against a freshly deployed contract, mirroring
//! how the deployment collaborator and a set of signers drive it.

use safety_kernel::contract::{SafetyContract, COMPLEX_ROLE};
use safety_kernel::errors::ContractError;
use safety_kernel::identity::Address;

fn signer(i: usize) -> Address {
    [
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
        "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
    ][i]
        .parse()
        .expect("valid signer address")
}

fn deploy() -> SafetyContract {
    SafetyContract::deploy(signer(0), 1, 0).expect("deploy")
}

#[test]
fn deployment_sets_value_and_version() {
    let c = deploy();
    assert_eq!(c.a(), 1);
    assert_eq!(c.initialized_version(), 1);
}

#[test]
fn initialize_after_deploy_fails() {
    let mut c = deploy();
    assert_eq!(c.initialize(2), Err(ContractError::AlreadyInitialized));
    assert_eq!(c.a(), 1);
}

#[test]
fn reinitialize_by_owner_succeeds() {
    let mut c = deploy();
    c.reinitialize(&signer(0), 2, 2).unwrap();
    assert_eq!((c.a(), c.initialized_version()), (2, 2));
}

#[test]
fn reinitialize_with_low_or_equal_version_fails() {
    let mut c = deploy();
    c.reinitialize(&signer(0), 2, 2).unwrap();
    assert_eq!(c.reinitialize(&signer(0), 3, 0), Err(ContractError::InvalidVersion));
    assert_eq!(c.reinitialize(&signer(0), 3, 1), Err(ContractError::InvalidVersion));
    assert_eq!((c.a(), c.initialized_version()), (2, 2));

    let mut fresh = deploy();
    assert_eq!(fresh.reinitialize(&signer(0), 2, 1), Err(ContractError::InvalidVersion));
    assert_eq!(fresh.reinitialize(&signer(0), 2, 0), Err(ContractError::InvalidVersion));
}

#[test]
fn reinitialize_by_non_owner_fails_until_transfer() {
    let mut c = deploy();
    assert_eq!(c.reinitialize(&signer(1), 111, 2), Err(ContractError::Unauthorized));

    c.transfer_ownership(&signer(0), signer(1)).unwrap();
    c.reinitialize(&signer(1), 111, 2).unwrap();

    assert_eq!(c.owner(), signer(1));
    assert_eq!(c.a(), 111);
    assert_eq!(c.initialized_version(), 2);
    // Former owner lost the capability.
    assert_eq!(c.reinitialize(&signer(0), 5, 9), Err(ContractError::Unauthorized));
}

#[test]
fn renounce_ownership_is_permanent() {
    let mut c = deploy();
    c.renounce_ownership(&signer(0)).unwrap();
    assert_eq!(c.owner(), Address::ZERO);
    assert_eq!(c.owner().to_string(), "0x0000000000000000000000000000000000000000");

    for i in 0..3 {
        assert_eq!(c.reinitialize(&signer(i), 111, 2), Err(ContractError::Unauthorized));
        assert_eq!(c.transfer_ownership(&signer(i), signer(2)), Err(ContractError::Unauthorized));
        assert_eq!(c.renounce_ownership(&signer(i)), Err(ContractError::Unauthorized));
    }
    assert_eq!(c.reinitialize(&Address::ZERO, 111, 2), Err(ContractError::Unauthorized));
    assert_eq!(c.a(), 1);
}

#[test]
fn transfer_by_non_owner_fails() {
    let mut c = deploy();
    assert_eq!(
        c.transfer_ownership(&signer(1), signer(2)),
        Err(ContractError::Unauthorized)
    );
    assert_eq!(c.owner(), signer(0));
}

#[test]
fn complex_by_deployer() {
    let c = deploy();
    assert_eq!(c.complex(&signer(0), 2), Ok(c.a() + 2));
}

#[test]
fn complex_after_grant_and_owner_renounce() {
    let mut c = deploy();
    c.grant_role(&signer(0), COMPLEX_ROLE, signer(1)).unwrap();
    assert_eq!(c.complex(&signer(1), 2), Ok(3));

    c.renounce_role(&signer(0), COMPLEX_ROLE, signer(0)).unwrap();
    assert_eq!(c.complex(&signer(0), 2), Err(ContractError::Unauthorized));
    assert_eq!(c.complex(&signer(1), 2), Ok(3));
}

#[test]
fn complex_fails_after_revoke() {
    let mut c = deploy();
    c.grant_role(&signer(0), COMPLEX_ROLE, signer(1)).unwrap();
    c.revoke_role(&signer(0), COMPLEX_ROLE, signer(1)).unwrap();
    assert_eq!(c.complex(&signer(1), 2), Err(ContractError::Unauthorized));
}

#[test]
fn renounce_role_for_other_account_fails() {
    let mut c = deploy();
    assert_eq!(
        c.renounce_role(&signer(1), COMPLEX_ROLE, signer(0)),
        Err(ContractError::BadConfirmation)
    );
    assert!(c.has_role(&COMPLEX_ROLE, &signer(0)));
}

#[test]
fn complex_without_role_fails() {
    let c = deploy();
    assert_eq!(c.complex(&signer(1), 2), Err(ContractError::Unauthorized));
}

#[test]
fn non_admin_cannot_grant_or_revoke() {
    let mut c = deploy();
    assert_eq!(
        c.grant_role(&signer(1), COMPLEX_ROLE, signer(1)),
        Err(ContractError::Unauthorized)
    );
    assert_eq!(
        c.revoke_role(&signer(1), COMPLEX_ROLE, signer(0)),
        Err(ContractError::Unauthorized)
    );
    assert!(!c.has_role(&COMPLEX_ROLE, &signer(1)));
    assert!(c.has_role(&COMPLEX_ROLE, &signer(0)));
}
