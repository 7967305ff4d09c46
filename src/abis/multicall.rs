use alloy::sol;

// Multicall v1 `aggregate` reverts as a whole when any inner call fails,
// which is the all-or-nothing contract the read groups rely on.
sol! {
    struct Call {
        address target;
        bytes callData;
    }

    #[sol(rpc)]
    interface IMulticall {
        function aggregate(Call[] calldata calls) external view returns (uint256 blockNumber, bytes[] memory returnData);
    }
}
