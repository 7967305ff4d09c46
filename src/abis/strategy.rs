use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IStrategy {
        function wantLockedTotal() external view returns (uint256);
    }
}
